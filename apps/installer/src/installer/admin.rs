//! Admin account management through the platform control binary.

use std::sync::Arc;

use tracing::{error, info, info_span, Span};

use crate::installer::executor::{CommandExecutor, ExecutionError};

/// Control binary path inside the platform image
pub const DEFAULT_CTL_PATH: &str = "/app/fnctl";

const CREATE_ADMIN_USER: &str = "create-admin-user";
const CHANGE_ADMIN_PASSWORD: &str = "change-admin-password";

/// Creates admin users and rotates their passwords.
///
/// Email and password are passed through untouched; validation belongs to
/// the control binary.
pub struct AdminManager {
    executor: Arc<dyn CommandExecutor>,
    ctl_path: String,
    span: Span,
}

impl AdminManager {
    pub fn new(executor: Arc<dyn CommandExecutor>) -> Self {
        Self {
            executor,
            ctl_path: DEFAULT_CTL_PATH.to_string(),
            span: info_span!("admin"),
        }
    }

    pub fn with_ctl_path(mut self, ctl_path: impl Into<String>) -> Self {
        self.ctl_path = ctl_path.into();
        self
    }

    pub fn ctl_path(&self) -> &str {
        &self.ctl_path
    }

    /// Create an admin user
    pub fn create_admin_user(&self, email: &str, password: &str) -> Result<(), ExecutionError> {
        self.run(CREATE_ADMIN_USER, email, password)
    }

    /// Change an existing admin's password
    pub fn change_admin_password(&self, email: &str, password: &str) -> Result<(), ExecutionError> {
        self.run(CHANGE_ADMIN_PASSWORD, email, password)
    }

    fn run(&self, subcommand: &str, email: &str, password: &str) -> Result<(), ExecutionError> {
        let _guard = self.span.enter();

        // Password stays out of log fields
        info!(%email, subcommand, "running control binary");

        let args = vec![
            self.ctl_path.clone(),
            subcommand.to_string(),
            email.to_string(),
            password.to_string(),
        ];

        match self.executor.execute_command(&args) {
            Ok(()) => {
                info!(%email, subcommand, "control binary succeeded");
                Ok(())
            }
            Err(e) => {
                error!(%email, subcommand, error = %e, "control binary failed");
                Err(e)
            }
        }
    }
}
