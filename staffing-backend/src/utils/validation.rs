// staffing-backend/src/utils/validation.rs

use crate::error::AppError;
use validator::ValidationErrors;

/// validator のエラーを AppError に変換（メッセージが無い場合は単一エラー）
pub fn handle_validation_error(err: ValidationErrors) -> AppError {
    let mut messages: Vec<String> = err
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().filter_map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| format!("{}: {}", field, m))
            })
        })
        .collect();
    messages.sort();

    if messages.is_empty() {
        AppError::ValidationError("Validation failed".to_string())
    } else {
        AppError::ValidationErrors(messages)
    }
}
