/// Uniform response envelope
///
/// Every endpoint, success or failure, answers with the same JSON wrapper:
///
/// ```json
/// { "sucesso": true, "dados": { ... } }
/// { "sucesso": false, "mensagem": "Produto não encontrado" }
/// ```
///
/// Validation failures additionally carry an `erros` list with one entry
/// per offending field.

use serde::{Deserialize, Serialize};

/// Response envelope wrapping every JSON body
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Whether the request succeeded
    pub sucesso: bool,

    /// Payload, present on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dados: Option<T>,

    /// Human-readable message, present on failure and on some successes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mensagem: Option<String>,

    /// Per-field validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub erros: Option<Vec<FieldError>>,
}

/// One field-level validation failure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldError {
    /// Field that failed validation
    pub campo: String,

    /// What was wrong with it
    pub mensagem: String,
}

impl<T> Envelope<T> {
    /// Successful envelope with a payload
    pub fn ok(dados: T) -> Self {
        Self {
            sucesso: true,
            dados: Some(dados),
            mensagem: None,
            erros: None,
        }
    }

    /// Successful envelope with a payload and a message
    pub fn ok_with_message(dados: T, mensagem: impl Into<String>) -> Self {
        Self {
            sucesso: true,
            dados: Some(dados),
            mensagem: Some(mensagem.into()),
            erros: None,
        }
    }

    /// Successful envelope with only a message, for deletions
    pub fn message(mensagem: impl Into<String>) -> Self {
        Self {
            sucesso: true,
            dados: None,
            mensagem: Some(mensagem.into()),
            erros: None,
        }
    }

    /// Failure envelope with a message
    pub fn error(mensagem: impl Into<String>) -> Self {
        Self {
            sucesso: false,
            dados: None,
            mensagem: Some(mensagem.into()),
            erros: None,
        }
    }

    /// Failure envelope with a message and field errors
    pub fn validation(mensagem: impl Into<String>, erros: Vec<FieldError>) -> Self {
        Self {
            sucesso: false,
            dados: None,
            mensagem: Some(mensagem.into()),
            erros: Some(erros),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ok_envelope_shape() {
        let envelope = Envelope::ok(json!({ "id": 1 }));
        let value = serde_json::to_value(&envelope).unwrap();

        assert_eq!(value["sucesso"], json!(true));
        assert_eq!(value["dados"]["id"], json!(1));
        assert!(value.get("mensagem").is_none());
        assert!(value.get("erros").is_none());
    }

    #[test]
    fn test_error_envelope_shape() {
        let envelope = Envelope::<()>::error("Produto não encontrado");
        let value = serde_json::to_value(&envelope).unwrap();

        assert_eq!(value["sucesso"], json!(false));
        assert_eq!(value["mensagem"], json!("Produto não encontrado"));
        assert!(value.get("dados").is_none());
    }

    #[test]
    fn test_validation_envelope_carries_field_errors() {
        let envelope = Envelope::<()>::validation(
            "Falha de validação",
            vec![FieldError {
                campo: "quantidade".to_string(),
                mensagem: "deve ser um inteiro não negativo".to_string(),
            }],
        );
        let value = serde_json::to_value(&envelope).unwrap();

        assert_eq!(value["sucesso"], json!(false));
        assert_eq!(value["erros"][0]["campo"], json!("quantidade"));
    }

    #[test]
    fn test_envelope_round_trip() {
        let envelope = Envelope::ok_with_message(json!([1, 2, 3]), "ok");
        let text = serde_json::to_string(&envelope).unwrap();
        let parsed: Envelope<serde_json::Value> = serde_json::from_str(&text).unwrap();

        assert!(parsed.sucesso);
        assert_eq!(parsed.dados, Some(json!([1, 2, 3])));
        assert_eq!(parsed.mensagem.as_deref(), Some("ok"));
    }
}
