/// Event types for the audit log
pub mod audit_events {
    pub const REGISTER: &str = "register";
    pub const EMAIL_VERIFIED: &str = "email_verified";
    pub const LOGIN: &str = "login";
    pub const LOGOUT: &str = "logout";
}
