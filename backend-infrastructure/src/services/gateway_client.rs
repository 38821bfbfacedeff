use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use backend_domain::ports::{PaymentGateway, ResolvedAccount, TransferAccepted};
use backend_domain::{BankDestination, RuntimeConfig};

/// HTTP client for the external payment gateway. All calls authenticate
/// with the configured secret key; responses share a
/// `{ status, message, data }` envelope.
pub struct HttpPaymentGateway {
    client: Client,
    base_url: String,
    secret_key: Option<String>,
    currency: String,
}

#[derive(Debug, Deserialize)]
struct GatewayResponse<T> {
    status: bool,
    #[serde(default)]
    message: String,
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct ResolveData {
    account_number: String,
    account_name: String,
}

#[derive(Debug, Deserialize)]
struct RecipientData {
    recipient_code: String,
}

#[derive(Debug, Deserialize)]
struct TransferData {
    transfer_code: String,
}

impl HttpPaymentGateway {
    pub fn new(config: &RuntimeConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds.max(3)))
            .build()?;
        Ok(Self {
            client,
            base_url: config.gateway_base_url.trim_end_matches('/').to_string(),
            secret_key: config.gateway_secret_key.clone(),
            currency: config.settlement_currency.clone(),
        })
    }

    fn secret(&self) -> Result<&str> {
        self.secret_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| anyhow!("gateway secret key is not configured"))
    }
}

async fn read_envelope<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let envelope: GatewayResponse<T> = response
        .json()
        .await
        .map_err(|err| anyhow!("gateway returned an unreadable response: {err}"))?;
    if !status.is_success() || !envelope.status {
        return Err(anyhow!("gateway rejected request: {}", envelope.message));
    }
    envelope
        .data
        .ok_or_else(|| anyhow!("gateway response is missing data"))
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn resolve_account(
        &self,
        bank_code: &str,
        account_number: &str,
    ) -> Result<ResolvedAccount> {
        let url = format!("{}/bank/resolve", self.base_url);
        debug!("resolving account {}@{}", account_number, bank_code);
        let response = self
            .client
            .get(&url)
            .bearer_auth(self.secret()?)
            .query(&[
                ("account_number", account_number),
                ("bank_code", bank_code),
            ])
            .send()
            .await?;
        let data: ResolveData = read_envelope(response).await?;
        Ok(ResolvedAccount {
            account_number: data.account_number,
            account_name: data.account_name,
        })
    }

    async fn create_transfer_recipient(&self, destination: &BankDestination) -> Result<String> {
        let url = format!("{}/transferrecipient", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(self.secret()?)
            .json(&json!({
                "type": "nuban",
                "name": destination.account_name,
                "account_number": destination.account_number,
                "bank_code": destination.bank_code,
                "currency": self.currency,
            }))
            .send()
            .await?;
        let data: RecipientData = read_envelope(response).await?;
        Ok(data.recipient_code)
    }

    async fn initiate_transfer(
        &self,
        recipient_code: &str,
        amount_minor: i64,
        reference: &str,
        reason: &str,
    ) -> Result<TransferAccepted> {
        let url = format!("{}/transfer", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(self.secret()?)
            .json(&json!({
                "source": "balance",
                "amount": amount_minor,
                "recipient": recipient_code,
                "reference": reference,
                "reason": reason,
            }))
            .send()
            .await?;
        let data: TransferData = read_envelope(response).await?;
        Ok(TransferAccepted {
            transfer_code: data.transfer_code,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_envelope_deserializes() {
        let body = r#"{"status":true,"message":"Account number resolved","data":{"account_number":"0123456789","account_name":"JANE ORGANIZER"}}"#;
        let envelope: GatewayResponse<ResolveData> =
            serde_json::from_str(body).expect("deserialize");
        assert!(envelope.status);
        let data = envelope.data.expect("data");
        assert_eq!(data.account_name, "JANE ORGANIZER");
    }

    #[test]
    fn rejection_envelope_keeps_the_message() {
        let body = r#"{"status":false,"message":"Could not resolve account name"}"#;
        let envelope: GatewayResponse<ResolveData> =
            serde_json::from_str(body).expect("deserialize");
        assert!(!envelope.status);
        assert!(envelope.data.is_none());
        assert_eq!(envelope.message, "Could not resolve account name");
    }

    #[test]
    fn transfer_envelope_carries_the_code() {
        let body = r#"{"status":true,"message":"Transfer has been queued","data":{"transfer_code":"TRF_1ptvuv321ahaa7q"}}"#;
        let envelope: GatewayResponse<TransferData> =
            serde_json::from_str(body).expect("deserialize");
        assert_eq!(
            envelope.data.expect("data").transfer_code,
            "TRF_1ptvuv321ahaa7q"
        );
    }
}
