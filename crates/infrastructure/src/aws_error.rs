use std::fmt::Debug;

use aws_sdk_ec2::error::ProvideErrorMetadata;

use shutoff_core::AppError;

/// Converts an AWS SDK failure into an internal application error.
pub(crate) fn aws_error<E>(operation: &str, error: &E) -> AppError
where
    E: ProvideErrorMetadata + Debug,
{
    // Transport and timeout failures carry no service metadata.
    if error.code().is_none() && error.message().is_none() {
        return AppError::Internal(format!("{operation} failed: {error:?}"));
    }

    describe_failure(operation, error.code(), error.message())
}

fn describe_failure(operation: &str, code: Option<&str>, message: Option<&str>) -> AppError {
    let message = message.unwrap_or("no message");
    match code {
        Some(code) => AppError::Internal(format!("{operation} failed ({code}): {message}")),
        None => AppError::Internal(format!("{operation} failed: {message}")),
    }
}
