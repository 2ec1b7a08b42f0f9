use actix_web::{HttpResponse, Responder};
use serde::Serialize;

use super::error::Res;

pub struct Success;
impl Success {
    pub fn created<T: Serialize>(body: T) -> Res<impl Responder> {
        Result::Ok(HttpResponse::Created().json(body))
    }
    pub fn ok<T: Serialize>(body: T) -> Res<impl Responder> {
        Result::Ok(HttpResponse::Ok().json(body))
    }
    pub fn no_content() -> Res<impl Responder> {
        Result::Ok(HttpResponse::NoContent().finish())
    }
}

/// Trims a customer phone number and rejects empty input.
///
/// The trimmed string is stored and looked up as-is; normalization only
/// happens when addressing an SMS.
pub fn require_phone_number(raw: &str) -> Res<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(super::error::AppError::BadRequest(
            "Please enter a phone number.".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

/// Masks all but the last three characters, for log lines.
pub fn mask_phone(phone_number: &str) -> String {
    let chars: Vec<char> = phone_number.chars().collect();
    let visible = chars.len().min(3);
    let hidden = chars.len() - visible;
    let tail: String = chars[hidden..].iter().collect();
    format!("{}{}", "*".repeat(hidden), tail)
}
