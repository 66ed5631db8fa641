use anyhow::anyhow;
use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use validator::{Validate, ValidationErrors};

use vibeflix_core::AppError;

const INVALID_DATA: &str = "Dados inválidos";

fn format_errors(errors: &ValidationErrors) -> Value {
    let mut details: Vec<(String, String)> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                let message = error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| format!("{} é inválido", field));
                (field.to_string(), message)
            })
        })
        .collect();
    details.sort();

    Value::Array(
        details
            .into_iter()
            .map(|(field, message)| json!({ "field": field, "message": message }))
            .collect(),
    )
}

fn rejection_details(rejection: &JsonRejection) -> Value {
    if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
        return json!([{ "message": "Cabeçalho 'Content-Type: application/json' ausente" }]);
    }

    let error_msg = rejection.body_text();

    if error_msg.contains("missing field") {
        let field = error_msg
            .split("missing field `")
            .nth(1)
            .and_then(|s| s.split('`').next())
            .unwrap_or("unknown");
        return json!([{ "field": field, "message": format!("{} é obrigatório", field) }]);
    }

    if error_msg.contains("invalid type") || error_msg.contains("invalid value") {
        return json!([{ "message": "Tipo de campo inválido" }]);
    }

    json!([{ "message": "Corpo da requisição inválido" }])
}

/// JSON body extractor that runs `validator` rules after deserializing.
///
/// Every failure is a 400 `{ "error": "Dados inválidos", "details": [...] }`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                AppError::bad_request(anyhow!(INVALID_DATA))
                    .with_details(rejection_details(&rejection))
            })?;

        value.validate().map_err(|errors| {
            AppError::bad_request(anyhow!(INVALID_DATA)).with_details(format_errors(&errors))
        })?;

        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(email(message = "Email inválido"))]
        email: String,
        #[validate(length(min = 6))]
        password: String,
    }

    #[test]
    fn test_format_errors_lists_each_field() {
        let sample = Sample {
            email: "nope".to_string(),
            password: "123".to_string(),
        };
        let details = format_errors(&sample.validate().unwrap_err());
        let details = details.as_array().unwrap();

        assert_eq!(details.len(), 2);
        assert_eq!(details[0]["field"], "email");
        assert_eq!(details[0]["message"], "Email inválido");
        assert_eq!(details[1]["field"], "password");
        assert_eq!(details[1]["message"], "password é inválido");
    }
}
