//! Envío de email saliente (best-effort)
//!
//! Contrato: nunca bloquea al caller, nunca hace fallar la request que
//! lo disparó. El envío se intenta estrictamente después del commit de
//! la transición; un fallo de transporte se loguea y se traga.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::config::environment::EnvironmentConfig;

/// Interfaz de salida de email. Implementaciones no devuelven error:
/// el fallo se resuelve internamente (log) por contrato best-effort.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str);
}

/// Despachar un email en background (fire-and-forget)
pub fn dispatch(mailer: Arc<dyn Mailer>, to: String, subject: String, body: String) {
    tokio::spawn(async move {
        mailer.send(&to, &subject, &body).await;
    });
}

/// Mailer sobre una API HTTP de correo. Si no hay MAIL_API_URL
/// configurada, los mensajes solo se loguean (modo desarrollo).
pub struct EmailService {
    client: reqwest::Client,
    api_url: Option<String>,
    from: String,
}

impl EmailService {
    pub fn new(config: &EnvironmentConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.mail_api_url.clone(),
            from: config.mail_from.clone(),
        }
    }
}

#[async_trait]
impl Mailer for EmailService {
    async fn send(&self, to: &str, subject: &str, body: &str) {
        let Some(api_url) = &self.api_url else {
            tracing::debug!("📧 Email (sin MAIL_API_URL, no enviado) para {}: {}", to, subject);
            return;
        };

        let payload = json!({
            "from": self.from,
            "to": to,
            "subject": subject,
            "text": body,
        });

        match self.client.post(api_url).json(&payload).send().await {
            Ok(response) if response.status().is_success() => {
                tracing::debug!("📧 Email enviado a {}: {}", to, subject);
            }
            Ok(response) => {
                // Best-effort: se loguea y se traga
                tracing::warn!(
                    "📧 Email a {} rechazado por la API de correo: {}",
                    to,
                    response.status()
                );
            }
            Err(e) => {
                tracing::warn!("📧 Error enviando email a {}: {}", to, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct RecordingMailer {
        sent: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, to: &str, subject: &str, _body: &str) {
            self.sent.lock().unwrap().push((to.to_string(), subject.to_string()));
        }
    }

    #[tokio::test]
    async fn test_dispatch_does_not_block_caller() {
        let mailer = Arc::new(RecordingMailer { sent: Mutex::new(Vec::new()) });

        dispatch(
            mailer.clone(),
            "owner@example.com".to_string(),
            "Car Returned".to_string(),
            "Your car has been returned.".to_string(),
        );

        // Dar tiempo a la tarea en background
        tokio::task::yield_now().await;
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "owner@example.com");
    }

    #[tokio::test]
    async fn test_email_service_without_api_url_swallows_silently() {
        let service = EmailService {
            client: reqwest::Client::new(),
            api_url: None,
            from: "noreply@swiftserve.example".to_string(),
        };

        // No panic, no error
        service.send("someone@example.com", "subject", "body").await;
    }
}
