use super::*;

#[test]
fn validate_requires_email_and_password() {
    let errors = validate("  ", "");
    assert_eq!(errors.get("email"), Some("Please enter email"));
    assert_eq!(errors.get("password"), Some("Please enter password"));
}

#[test]
fn validate_accepts_filled_form() {
    assert!(validate("a@b.com", "pw").is_empty());
}

#[test]
fn credentials_trim_email_only() {
    assert_eq!(
        credentials(" a@b.com ", " pw "),
        Credentials { email: "a@b.com".to_owned(), password: " pw ".to_owned() }
    );
}
