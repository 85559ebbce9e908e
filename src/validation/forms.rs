use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{
    validate_email_format, validate_matches, validate_max_length, validate_password_format,
    validate_username_format, FieldErrors, Rules, Validate,
};
use crate::database::models::{Progress, Visibility};

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RegisterForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    pub password: String,
    pub confirm_password: Option<String>,
    pub security_question: String,
    pub security_answer: String,
}

impl Validate for RegisterForm {
    const INVALID_MESSAGE: &'static str = "Invalid register form data!";

    fn validate(&self) -> Result<(), FieldErrors> {
        let mut rules = Rules::new()
            .required("firstName", &self.first_name)
            .required("lastName", &self.last_name)
            .required("email", &self.email)
            .check("email", validate_email_format(self.email.trim()))
            .required("username", &self.username)
            .check("username", validate_username_format(&self.username))
            .required("password", &self.password)
            .check("password", validate_password_format(&self.password))
            .required("securityQuestion", &self.security_question)
            .required("securityAnswer", &self.security_answer);

        if let Some(confirm) = &self.confirm_password {
            rules = rules.check("confirmPassword", validate_matches(&self.password, confirm));
        }

        rules.finish()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl Validate for LoginForm {
    const INVALID_MESSAGE: &'static str = "Invalid login form data!";

    fn validate(&self) -> Result<(), FieldErrors> {
        Rules::new()
            .required("username", &self.username)
            .required("password", &self.password)
            .finish()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ForgotPasswordForm {
    pub username_or_email: String,
}

impl Validate for ForgotPasswordForm {
    const INVALID_MESSAGE: &'static str = "Invalid security question form data!";

    fn validate(&self) -> Result<(), FieldErrors> {
        Rules::new()
            .required("usernameOrEmail", &self.username_or_email)
            .finish()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SecurityAnswerForm {
    pub username: String,
    pub security_answer: String,
}

impl Validate for SecurityAnswerForm {
    const INVALID_MESSAGE: &'static str = "Invalid security answer form data!";

    fn validate(&self) -> Result<(), FieldErrors> {
        Rules::new()
            .required("username", &self.username)
            .required("securityAnswer", &self.security_answer)
            .finish()
    }
}

/// Password reset for a user who answered their security question
///
/// The answer is sent again and re-verified so a reset cannot be issued
/// with a username alone.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResetPasswordForm {
    pub username: String,
    pub security_answer: String,
    pub new_password: String,
    pub new_confirm_password: String,
}

impl Validate for ResetPasswordForm {
    const INVALID_MESSAGE: &'static str = "Invalid reset password form data!";

    fn validate(&self) -> Result<(), FieldErrors> {
        Rules::new()
            .required("username", &self.username)
            .required("securityAnswer", &self.security_answer)
            .required("newPassword", &self.new_password)
            .check("newPassword", validate_password_format(&self.new_password))
            .required("newConfirmPassword", &self.new_confirm_password)
            .check("newConfirmPassword", validate_matches(&self.new_password, &self.new_confirm_password))
            .finish()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChangeDetailsForm {
    pub user_id: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
}

impl Validate for ChangeDetailsForm {
    const INVALID_MESSAGE: &'static str = "Full Name, Password and Address properties are required!";

    fn validate(&self) -> Result<(), FieldErrors> {
        Rules::new()
            .required("userId", &self.user_id)
            .required("password", &self.password)
            .required("firstName", &self.first_name)
            .required("lastName", &self.last_name)
            .required("address", &self.address)
            .finish()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChangePasswordForm {
    pub user_id: String,
    pub old_password: String,
    pub new_password: String,
    pub new_confirm_password: String,
}

impl Validate for ChangePasswordForm {
    const INVALID_MESSAGE: &'static str =
        "Old Password, New Password, and Confirm Password properties are required!";

    fn validate(&self) -> Result<(), FieldErrors> {
        Rules::new()
            .required("userId", &self.user_id)
            .required("oldPassword", &self.old_password)
            .required("newPassword", &self.new_password)
            .check("newPassword", validate_password_format(&self.new_password))
            .required("newConfirmPassword", &self.new_confirm_password)
            .check("newConfirmPassword", validate_matches(&self.new_password, &self.new_confirm_password))
            .finish()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChangeSecurityQaForm {
    pub user_id: String,
    pub password: String,
    pub new_security_question: String,
    pub new_security_q_answer: String,
}

impl Validate for ChangeSecurityQaForm {
    const INVALID_MESSAGE: &'static str =
        "New Security Question, New Security Question Answer, and Password properties are required!";

    fn validate(&self) -> Result<(), FieldErrors> {
        Rules::new()
            .required("userId", &self.user_id)
            .required("password", &self.password)
            .required("newSecurityQuestion", &self.new_security_question)
            .required("newSecurityQAnswer", &self.new_security_q_answer)
            .finish()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SubtaskProgressForm {
    pub progress: String,
}

impl SubtaskProgressForm {
    /// Only meaningful after `validate` succeeded
    pub fn parsed(&self) -> Option<Progress> {
        self.progress.parse().ok()
    }
}

impl Validate for SubtaskProgressForm {
    const INVALID_MESSAGE: &'static str = "Invalid subtask progress data!";

    fn validate(&self) -> Result<(), FieldErrors> {
        let known = self
            .progress
            .parse::<Progress>()
            .map(|_| ())
            .map_err(|_| format!("Unknown progress value {:?}", self.progress));

        Rules::new()
            .required("progress", &self.progress)
            .check("progress", known)
            .finish()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreatePostForm {
    pub title: String,
    pub color: String,
    pub category: String,
    pub visibility: String,
    pub due_date: Option<DateTime<Utc>>,
    pub authorized_users: Vec<String>,
}

impl CreatePostForm {
    pub fn parsed_visibility(&self) -> Option<Visibility> {
        self.visibility.parse().ok()
    }
}

impl Validate for CreatePostForm {
    const INVALID_MESSAGE: &'static str = "Invalid create post form data!";

    fn validate(&self) -> Result<(), FieldErrors> {
        let visibility = self
            .visibility
            .parse::<Visibility>()
            .map(|_| ())
            .map_err(|_| "Visibility must be public or private".to_string());

        Rules::new()
            .required("title", &self.title)
            .check("title", validate_max_length(&self.title, 120))
            .required("color", &self.color)
            .required("category", &self.category)
            .required("visibility", &self.visibility)
            .check("visibility", visibility)
            .finish()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateTaskForm {
    pub title: String,
}

impl Validate for CreateTaskForm {
    const INVALID_MESSAGE: &'static str = "Invalid create task form data!";

    fn validate(&self) -> Result<(), FieldErrors> {
        Rules::new()
            .required("title", &self.title)
            .check("title", validate_max_length(&self.title, 120))
            .finish()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateSubtaskForm {
    pub title: String,
    pub priority: Option<u8>,
    pub due_date: Option<DateTime<Utc>>,
}

impl Validate for CreateSubtaskForm {
    const INVALID_MESSAGE: &'static str = "Invalid create subtask form data!";

    fn validate(&self) -> Result<(), FieldErrors> {
        let priority = match self.priority {
            Some(p) if !(1..=10).contains(&p) => Err("Priority must be between 1 and 10".to_string()),
            _ => Ok(()),
        };

        Rules::new()
            .required("title", &self.title)
            .check("title", validate_max_length(&self.title, 120))
            .check("priority", priority)
            .finish()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateCommentForm {
    pub content: String,
}

impl Validate for CreateCommentForm {
    const INVALID_MESSAGE: &'static str = "Invalid comment form data!";

    fn validate(&self) -> Result<(), FieldErrors> {
        Rules::new()
            .required("content", &self.content)
            .check("content", validate_max_length(&self.content, 1000))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn register_form() -> RegisterForm {
        serde_json::from_value(json!({
            "firstName": "Jane",
            "lastName": "Doe",
            "email": "jane@example.com",
            "username": "jane",
            "password": "correct-horse",
            "confirmPassword": "correct-horse",
            "securityQuestion": "First pet?",
            "securityAnswer": "Rex"
        }))
        .unwrap()
    }

    #[test]
    fn complete_registration_passes() {
        assert!(register_form().validate().is_ok());
    }

    #[test]
    fn missing_fields_are_reported_by_name() {
        let form: RegisterForm = serde_json::from_value(json!({ "username": "jane" })).unwrap();
        let errors = form.validate().unwrap_err();
        assert!(errors.contains_key("firstName"));
        assert!(errors.contains_key("email"));
        assert!(errors.contains_key("securityAnswer"));
        assert!(!errors.contains_key("username"));
    }

    #[test]
    fn mismatched_confirmation_is_rejected() {
        let mut form = register_form();
        form.confirm_password = Some("different-pass".to_string());
        assert!(form.validate().unwrap_err().contains_key("confirmPassword"));
    }

    #[test]
    fn security_qa_form_reads_camel_case_wire_names() {
        let form: ChangeSecurityQaForm = serde_json::from_value(json!({
            "userId": "x",
            "password": "p",
            "newSecurityQuestion": "q",
            "newSecurityQAnswer": "a"
        }))
        .unwrap();
        assert!(form.validate().is_ok());
        assert_eq!(form.new_security_q_answer, "a");
    }

    #[test]
    fn progress_must_be_known() {
        let ok = SubtaskProgressForm { progress: "working-on-it".to_string() };
        assert!(ok.validate().is_ok());
        assert_eq!(ok.parsed(), Some(Progress::WorkingOnIt));

        let bad = SubtaskProgressForm { progress: "halfway".to_string() };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn subtask_priority_range() {
        let form = CreateSubtaskForm {
            title: "Write tests".to_string(),
            priority: Some(11),
            due_date: None,
        };
        assert!(form.validate().unwrap_err().contains_key("priority"));
    }
}
