use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use tracing::{debug, info};

use crate::config::ApiConfig;
use crate::error::ConvergeError;
use crate::model::{NewZone, RrsetSpec, Zone};
use crate::powerdns::types::*;
use crate::reconcile::AuthoritativeDnsClient;

#[derive(Clone)]
pub struct PowerDnsClient {
    http: Client,
    base_url: String, // e.g. "http://127.0.0.1:8081/api/v1"
    api_key: String,
    server_id: String, // usually "localhost"
}

impl PowerDnsClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ConvergeError> {
        let http = Client::builder()
            .danger_accept_invalid_certs(!config.verify_tls)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url_root().to_string(),
            api_key: config.api_key.clone(),
            server_id: config.server_id.clone(),
        })
    }

    fn auth_header(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("X-API-Key", &self.api_key)
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/servers/{}/{}",
            self.base_url,
            self.server_id,
            path.trim_start_matches('/')
        )
    }

    pub async fn fetch_zone(&self, name: &str) -> Result<Option<PdnsZone>, ConvergeError> {
        let url = self.url(&format!("zones/{}", name));
        let res = self.auth_header(self.http.get(url)).send().await?;
        if res.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if res.status() == StatusCode::UNPROCESSABLE_ENTITY {
            // Older servers answer 422 "Could not find domain" for unknown zones.
            let message = error_message(res).await;
            if message.contains("Could not find domain") {
                return Ok(None);
            }
            return Err(ConvergeError::api(
                "get_zone",
                StatusCode::UNPROCESSABLE_ENTITY,
                message,
            ));
        }
        let res = ensure_success("get_zone", res).await?;
        Ok(Some(res.json::<PdnsZone>().await?))
    }

    pub async fn post_zone(&self, z: &PdnsZoneCreate) -> Result<(), ConvergeError> {
        let url = self.url("zones");
        let res = self.auth_header(self.http.post(url)).json(z).send().await?;
        let status = res.status();
        if status == StatusCode::CONFLICT {
            return Err(ConvergeError::Conflict {
                zone: z.name.clone(),
            });
        }
        if status == StatusCode::UNPROCESSABLE_ENTITY {
            let message = error_message(res).await;
            if message.contains("already exists") {
                return Err(ConvergeError::Conflict {
                    zone: z.name.clone(),
                });
            }
            return Err(ConvergeError::api("create_zone", status, message));
        }
        ensure_success("create_zone", res).await?;
        Ok(())
    }

    pub async fn patch_rrsets(
        &self,
        zone_name: &str,
        rrsets: &[PdnsRrset],
    ) -> Result<Option<Value>, ConvergeError> {
        let url = self.url(&format!("zones/{}", zone_name));
        let body = PdnsRrsetPatch { rrsets };
        let res = self
            .auth_header(self.http.patch(url))
            .json(&body)
            .send()
            .await?;
        let res = ensure_success("patch_rrsets", res).await?;
        let text = res.text().await?;
        Ok(response_payload(&text))
    }

    pub async fn remove_zone(&self, name: &str) -> Result<(), ConvergeError> {
        let url = self.url(&format!("zones/{}", name));
        let res = self.auth_header(self.http.delete(url)).send().await?;
        ensure_success("delete_zone", res).await?;
        Ok(())
    }
}

#[async_trait]
impl AuthoritativeDnsClient for PowerDnsClient {
    async fn get_zone(&self, name: &str) -> Result<Option<Zone>, ConvergeError> {
        debug!(zone = name, "fetching zone");
        Ok(self.fetch_zone(name).await?.map(Zone::from))
    }

    async fn create_zone(&self, zone: &NewZone) -> Result<(), ConvergeError> {
        info!(zone = %zone.name, kind = %zone.kind, "creating zone");
        self.post_zone(&PdnsZoneCreate::from(zone)).await
    }

    async fn delete_zone(&self, name: &str) -> Result<(), ConvergeError> {
        info!(zone = name, "deleting zone");
        self.remove_zone(name).await
    }

    async fn create_rrset(
        &self,
        zone: &str,
        rrset: &RrsetSpec,
    ) -> Result<Option<Value>, ConvergeError> {
        info!(zone, name = %rrset.name, rtype = %rrset.rtype, "replacing rrset");
        self.patch_rrsets(zone, &[PdnsRrset::replace(rrset)]).await
    }

    async fn delete_rrset(
        &self,
        zone: &str,
        rrset: &RrsetSpec,
    ) -> Result<Option<Value>, ConvergeError> {
        info!(zone, name = %rrset.name, rtype = %rrset.rtype, "deleting rrset");
        self.patch_rrsets(zone, &[PdnsRrset::delete(rrset)]).await
    }
}

async fn ensure_success(
    operation: &'static str,
    res: Response,
) -> Result<Response, ConvergeError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let message = error_message(res).await;
    Err(ConvergeError::api(operation, status, message))
}

/// Prefer the `error` field of the JSON body, fall back to the raw text.
async fn error_message(res: Response) -> String {
    let status = res.status();
    let text = res.text().await.unwrap_or_default();
    match serde_json::from_str::<PdnsErrorBody>(&text) {
        Ok(body) => body.error,
        Err(_) if text.trim().is_empty() => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
        Err(_) => text.trim().to_string(),
    }
}

/// PATCH usually answers 204 with no body; anything else is passed through.
fn response_payload(text: &str) -> Option<Value> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Some(serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string())))
}
