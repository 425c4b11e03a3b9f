use super::*;

#[test]
fn register_input_trims_names() {
    assert_eq!(
        validate_register_input(" giulia@example.com ", " giulia ", "password1"),
        Ok((
            "giulia@example.com".to_owned(),
            "giulia".to_owned(),
            "password1".to_owned()
        ))
    );
}

#[test]
fn register_input_requires_email_and_username() {
    assert_eq!(validate_register_input("", "giulia", "password1"), Err("Fill in email and username."));
    assert_eq!(validate_register_input("g@x.it", "  ", "password1"), Err("Fill in email and username."));
}

#[test]
fn register_input_rejects_email_without_at() {
    assert_eq!(
        validate_register_input("giulia.example.com", "giulia", "password1"),
        Err("Enter a valid email address.")
    );
}

#[test]
fn register_input_enforces_password_length() {
    assert_eq!(
        validate_register_input("g@x.it", "giulia", "12345"),
        Err("Passwords need at least 6 characters.")
    );
    assert!(validate_register_input("g@x.it", "giulia", "123456").is_ok());
}
