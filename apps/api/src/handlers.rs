pub mod health;
pub mod remediation;
