// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::primitives::{Address, Bytes, B256};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tracing::trace;

use crate::{DecryptionResult, EncryptedInput, EncryptionOracle, OracleError};

const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Serialize)]
struct EncryptRequest {
    contract_address: Address,
    user_address: Address,
    value: u64,
}

#[derive(Deserialize)]
struct EncryptResponse {
    encrypted_data: Bytes,
    proof: Bytes,
}

#[derive(Serialize)]
struct PublicDecryptRequest {
    contract_address: Address,
    handles: Vec<B256>,
}

#[derive(Deserialize)]
struct PublicDecryptResponse {
    clear_values: HashMap<B256, u64>,
    encoded_values: Bytes,
    proof: Bytes,
}

/// HTTP client for an FHE relayer exposing encrypt and public-decrypt
/// endpoints. Stateless: each call is a single request/response round-trip.
#[derive(Clone)]
pub struct RelayerClient {
    http: reqwest::Client,
    base_url: String,
}

impl RelayerClient {
    pub fn new(base_url: &str) -> Result<Self, OracleError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| OracleError::Unavailable(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn post<Req, Res>(&self, path: &str, body: &Req) -> Result<Res, OracleError>
    where
        Req: Serialize,
        Res: for<'de> Deserialize<'de>,
    {
        let url = format!("{}{}", self.base_url, path);
        trace!(url = %url, "relayer request");

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| OracleError::Unavailable(e.to_string()))?;

        match response.status() {
            status if status.is_success() => response
                .json::<Res>()
                .await
                .map_err(|e| OracleError::MalformedResponse(e.to_string())),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                let msg = response.text().await.unwrap_or_default();
                Err(OracleError::InvalidInput(msg))
            }
            status => Err(OracleError::Unavailable(format!(
                "relayer returned {status}"
            ))),
        }
    }
}

#[async_trait]
impl EncryptionOracle for RelayerClient {
    async fn encrypt(
        &self,
        contract: Address,
        submitter: Address,
        value: u64,
    ) -> Result<EncryptedInput, OracleError> {
        let response: EncryptResponse = self
            .post(
                "/v1/encrypt",
                &EncryptRequest {
                    contract_address: contract,
                    user_address: submitter,
                    value,
                },
            )
            .await?;

        Ok(EncryptedInput {
            encrypted_data: response.encrypted_data,
            proof: response.proof,
        })
    }

    async fn request_decryption(
        &self,
        handles: &[B256],
        contract: Address,
    ) -> Result<DecryptionResult, OracleError> {
        let response: PublicDecryptResponse = self
            .post(
                "/v1/public-decrypt",
                &PublicDecryptRequest {
                    contract_address: contract,
                    handles: handles.to_vec(),
                },
            )
            .await?;

        // Every requested handle must come back with a clear value,
        // otherwise the proof cannot cover the full request.
        for handle in handles {
            if !response.clear_values.contains_key(handle) {
                return Err(OracleError::MalformedResponse(format!(
                    "missing clear value for handle {handle}"
                )));
            }
        }

        Ok(DecryptionResult {
            clear_values: response.clear_values,
            encoded_values: response.encoded_values,
            proof: response.proof,
        })
    }
}
