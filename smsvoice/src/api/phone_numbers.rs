//! Phone number lookups
//!
//! Pools are seeded from origination identities. For phone numbers the ISO
//! country code has to be looked up remotely; sender IDs carry it in their
//! ARN.

use serde::{Deserialize, Serialize};

use super::error::ApiError;
use super::Client;

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribePhoneNumbersRequest {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub phone_number_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribePhoneNumbersResponse {
    #[serde(default)]
    pub phone_numbers: Vec<PhoneNumberInformation>,
    #[serde(default)]
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PhoneNumberInformation {
    pub phone_number_arn: String,
    #[serde(default)]
    pub phone_number_id: Option<String>,
    pub phone_number: String,
    pub iso_country_code: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message_type: String,
}

impl Client {
    /// DescribePhoneNumbers - one page
    pub async fn describe_phone_numbers(
        &self,
        request: &DescribePhoneNumbersRequest,
    ) -> Result<DescribePhoneNumbersResponse, ApiError> {
        self.post("DescribePhoneNumbers", request).await
    }

    /// Find a phone number by id or ARN, draining pagination
    pub async fn find_phone_number_by_id(
        &self,
        id: &str,
    ) -> Result<PhoneNumberInformation, ApiError> {
        let mut next_token = None;

        loop {
            let page = self
                .describe_phone_numbers(&DescribePhoneNumbersRequest {
                    phone_number_ids: vec![id.to_string()],
                    next_token: next_token.take(),
                    max_results: None,
                })
                .await?;

            if let Some(number) = page.phone_numbers.into_iter().next() {
                return Ok(number);
            }

            match page.next_token {
                Some(token) => next_token = Some(token),
                None => break,
            }
        }

        Err(ApiError::NotFound(format!(
            "phone number {} not found",
            id
        )))
    }

    /// ISO country code for a phone-number origination identity
    pub async fn iso_country_code_for_phone_number(&self, id: &str) -> Result<String, ApiError> {
        let number = self.find_phone_number_by_id(id).await?;
        Ok(number.iso_country_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_helpers::test_client;
    use mockito::Server;

    #[tokio::test]
    async fn country_code_lookup_uses_describe_phone_numbers() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .match_header("x-amz-target", "PinpointSMSVoiceV2.DescribePhoneNumbers")
            .with_status(200)
            .with_body(
                r#"{"PhoneNumbers":[{"PhoneNumberArn":"arn:aws:sms-voice:us-east-1:123456789012:phone-number/pn-1","PhoneNumberId":"pn-1","PhoneNumber":"+12065550100","IsoCountryCode":"US","Status":"ACTIVE","MessageType":"TRANSACTIONAL"}]}"#,
            )
            .create_async()
            .await;

        let client = test_client(&server.url());
        let code = client
            .iso_country_code_for_phone_number("pn-1")
            .await
            .unwrap();

        assert_eq!(code, "US");
    }

    #[tokio::test]
    async fn missing_phone_number_reports_not_found() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .with_status(200)
            .with_body(r#"{"PhoneNumbers":[]}"#)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let result = client.find_phone_number_by_id("pn-404").await;

        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }
}
