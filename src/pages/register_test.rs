use super::*;

fn form(name: &str, email: &str, password: &str, role: &str) -> Signup {
    Signup { name: name.to_owned(), email: email.to_owned(), password: password.to_owned(), role: role.to_owned() }
}

#[test]
fn validate_flags_each_blank_field() {
    let errors = validate(&form("Ann", "", "pw", " "));
    assert_eq!(errors.len(), 2);
    assert_eq!(errors.get("email"), Some("Please enter email"));
    assert_eq!(errors.get("role"), Some("Please enter role"));
}

#[test]
fn normalized_keeps_password_verbatim() {
    let cleaned = normalized(&form(" Ann ", " a@b.com", " pw ", "sender "));
    assert_eq!(cleaned, form("Ann", "a@b.com", " pw ", "sender"));
}
