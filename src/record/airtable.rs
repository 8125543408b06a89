//! Airtable REST client.

use std::collections::HashSet;

use async_trait::async_trait;
use reqwest::{RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{equals_formula, timestamp_now, RecordError, RecordStore};
use crate::config::RecordStoreConfig;
use crate::constants::{field, MAX_PAGES};
use crate::model::{Record, VehicleAttributes, VehicleImageRecord, VehicleRecord, VehicleStatus};

/// One page of a list request.
#[derive(Debug, Deserialize)]
struct ListResponse<F> {
    records: Vec<Record<F>>,
    offset: Option<String>,
}

/// Body of a create or update request.
#[derive(Debug, Serialize)]
struct WriteRequest<'a, F> {
    records: [WriteRecord<'a, F>; 1],
}

#[derive(Debug, Serialize)]
struct WriteRecord<'a, F> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    fields: &'a F,
}

/// Parameters of a filtered list request.
#[derive(Debug)]
struct Select<'a> {
    formula: String,
    max_records: Option<usize>,
    sort: Option<(&'a str, &'a str)>,
}

#[derive(Debug, Clone)]
pub struct AirtableClient {
    http: reqwest::Client,
    api_url: Url,
    base_id: String,
    api_key: String,
    vehicles_table: String,
    images_table: String,
    /// Most list pages fetched for one select
    max_pages: usize,
}

impl AirtableClient {
    /// Build a client from configuration. Fails if the API key or base id is
    /// missing, or the API URL cannot be parsed.
    pub fn new(config: &RecordStoreConfig) -> Result<Self, RecordError> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| RecordError::missing_credentials("AIRTABLE_API_KEY"))?;
        if config.base_id.trim().is_empty() {
            return Err(RecordError::missing_credentials("AIRTABLE_BASE_ID"));
        }
        let api_url = Url::parse(&config.api_url).map_err(|_| RecordError::invalid_url(&config.api_url))?;
        let http = reqwest::Client::builder()
            .user_agent(concat!("tradelux/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            api_url,
            base_id: config.base_id.trim().to_string(),
            api_key: api_key.to_string(),
            vehicles_table: config.vehicles_table.clone(),
            images_table: config.images_table.clone(),
            max_pages: MAX_PAGES,
        })
    }

    /// `{api_url}/{base_id}/{table}`, with the table name percent-encoded.
    fn table_url(&self, table: &str) -> Result<Url, RecordError> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| RecordError::invalid_url(self.api_url.as_str()))?
            .pop_if_empty()
            .push(&self.base_id)
            .push(table);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, RecordError> {
        let response = request.bearer_auth(&self.api_key).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let message = error_message(&body);
            log::warn!("Airtable request failed with {}: {}", status, message);
            return Err(RecordError::status(status.as_u16(), message));
        }
        Ok(serde_json::from_str(&body)?)
    }

    /// Run a filtered list request, following pagination offsets unless a
    /// record limit was given.
    ///
    /// Stops early on a repeated offset or after `max_pages` pages, keeping
    /// the records fetched so far.
    async fn select<F: DeserializeOwned>(
        &self,
        table: &str,
        select: &Select<'_>,
    ) -> Result<Vec<Record<F>>, RecordError> {
        let mut records = Vec::new();
        let mut offset: Option<String> = None;
        let mut seen_offsets = HashSet::new();
        for page_number in 1.. {
            let mut url = self.table_url(table)?;
            {
                let mut query = url.query_pairs_mut();
                if let Some(offset) = &offset {
                    query.append_pair("offset", offset);
                }
                query.append_pair("filterByFormula", &select.formula);
                if let Some(max) = select.max_records {
                    query.append_pair("maxRecords", &max.to_string());
                }
                if let Some((field, direction)) = select.sort {
                    query.append_pair("sort[0][field]", field);
                    query.append_pair("sort[0][direction]", direction);
                }
            }

            let page: ListResponse<F> = self.send(self.http.get(url)).await?;
            records.extend(page.records);
            let next = match page.offset {
                Some(next) if select.max_records.is_none() => next,
                _ => break,
            };
            if !seen_offsets.insert(next.clone()) {
                log::warn!("{} returned offset {} twice, stopping pagination", table, next);
                break;
            }
            if page_number >= self.max_pages {
                log::warn!("{} has more than {} pages, stopping pagination", table, self.max_pages);
                break;
            }
            offset = Some(next);
        }
        log::debug!("Fetched {} records from {}", records.len(), table);
        Ok(records)
    }

    /// Create or update one record and return what the store echoed back.
    async fn write<F: Serialize + DeserializeOwned>(
        &self,
        table: &str,
        record_id: Option<&str>,
        fields: &F,
    ) -> Result<Option<Record<F>>, RecordError> {
        let url = self.table_url(table)?;
        let body = WriteRequest {
            records: [WriteRecord { id: record_id, fields }],
        };
        let request = match record_id {
            Some(_) => self.http.patch(url),
            None => self.http.post(url),
        };
        let response: ListResponse<F> = self.send(request.json(&body)).await?;
        Ok(response.records.into_iter().next())
    }
}

/// Pull a readable message out of an Airtable error body.
///
/// Errors arrive as `{"error": {"type": .., "message": ..}}` or as
/// `{"error": "NOT_FOUND"}`; anything else is passed through as text.
fn error_message(body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    let error = parsed.as_ref().and_then(|value| value.get("error"));
    match error {
        Some(serde_json::Value::String(kind)) => kind.clone(),
        Some(object) => object
            .get("message")
            .or_else(|| object.get("type"))
            .and_then(|value| value.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| object.to_string()),
        None => body.trim().to_string(),
    }
}

#[async_trait]
impl RecordStore for AirtableClient {
    async fn get_vehicle(&self, vehicle_id: &str) -> Result<Option<VehicleRecord>, RecordError> {
        let select = Select {
            formula: equals_formula(field::VIN, vehicle_id),
            max_records: Some(1),
            sort: None,
        };
        let records = self.select(&self.vehicles_table, &select).await?;
        Ok(records.into_iter().next())
    }

    async fn get_vehicle_images(
        &self,
        vehicle_id: &str,
    ) -> Result<Vec<VehicleImageRecord>, RecordError> {
        let select = Select {
            formula: equals_formula(field::VIN, vehicle_id),
            max_records: None,
            sort: Some((field::ORDER, "asc")),
        };
        let records: Vec<Record<VehicleImageRecord>> = self.select(&self.images_table, &select).await?;
        Ok(records.into_iter().map(|record| record.fields).collect())
    }

    async fn list_vehicles(&self, status: VehicleStatus) -> Result<Vec<VehicleRecord>, RecordError> {
        let select = Select {
            formula: equals_formula(field::STATUS, status.as_str()),
            max_records: None,
            sort: Some((field::CREATED, "desc")),
        };
        self.select(&self.vehicles_table, &select).await
    }

    async fn create_vehicle(
        &self,
        mut fields: VehicleAttributes,
    ) -> Result<Option<VehicleRecord>, RecordError> {
        let now = timestamp_now();
        fields.status = Some(VehicleStatus::Active);
        fields.created = Some(now.clone());
        fields.updated = Some(now);
        let record = self.write(&self.vehicles_table, None, &fields).await?;
        if let Some(record) = &record {
            log::info!("Created vehicle record {}", record.id);
        }
        Ok(record)
    }

    async fn update_vehicle(
        &self,
        record_id: &str,
        mut fields: VehicleAttributes,
    ) -> Result<Option<VehicleRecord>, RecordError> {
        fields.updated = Some(timestamp_now());
        let record = self.write(&self.vehicles_table, Some(record_id), &fields).await?;
        log::info!("Updated vehicle record {}", record_id);
        Ok(record)
    }

    async fn add_vehicle_image(
        &self,
        fields: VehicleImageRecord,
    ) -> Result<Option<VehicleImageRecord>, RecordError> {
        let record = self.write(&self.images_table, None, &fields).await?;
        Ok(record.map(|record| record.fields))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn client(url: String) -> AirtableClient {
        let config = RecordStoreConfig {
            api_url: url,
            base_id: "appTEST".into(),
            api_key: Some("key123".into()),
            ..Default::default()
        };
        AirtableClient::new(&config).unwrap()
    }

    #[test]
    fn test_missing_credentials() {
        let config = RecordStoreConfig {
            base_id: "appTEST".into(),
            ..Default::default()
        };
        assert!(matches!(
            AirtableClient::new(&config),
            Err(RecordError::MissingCredentials { name }) if name == "AIRTABLE_API_KEY"
        ));

        let config = RecordStoreConfig {
            api_key: Some("key".into()),
            ..Default::default()
        };
        assert!(matches!(
            AirtableClient::new(&config),
            Err(RecordError::MissingCredentials { name }) if name == "AIRTABLE_BASE_ID"
        ));
    }

    #[test]
    fn test_table_url_encodes_name() {
        let client = client("https://api.airtable.com/v0".into());
        let url = client.table_url("Vehicle Images").unwrap();
        assert_eq!(url.as_str(), "https://api.airtable.com/v0/appTEST/Vehicle%20Images");
    }

    #[test]
    fn test_error_message_shapes() {
        assert_eq!(
            error_message(r#"{"error":{"type":"INVALID_PERMISSIONS","message":"Not allowed"}}"#),
            "Not allowed"
        );
        assert_eq!(error_message(r#"{"error":"NOT_FOUND"}"#), "NOT_FOUND");
        assert_eq!(error_message("Bad gateway\n"), "Bad gateway");
    }

    #[tokio::test]
    async fn get_vehicle_filters_by_vin_and_limits_to_one() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/appTEST/Vehicles")
            .match_header("authorization", "Bearer key123")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("filterByFormula".into(), "{VIN} = 'W1K'".into()),
                Matcher::UrlEncoded("maxRecords".into(), "1".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"records":[{"id":"rec1","createdTime":"2024-01-01T00:00:00.000Z","fields":{"VIN":"W1K","Year":2023,"Make":"Mercedes Benz"}}],"offset":"ignored"}"#)
            .create_async()
            .await;

        let record = client(server.url()).get_vehicle("W1K").await.unwrap().unwrap();

        mock.assert_async().await;
        assert_eq!(record.id, "rec1");
        assert_eq!(record.fields.year, Some(2023));
        assert_eq!(record.fields.make.as_deref(), Some("Mercedes Benz"));
    }

    #[tokio::test]
    async fn get_vehicle_not_found_is_none() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/appTEST/Vehicles")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"records":[]}"#)
            .create_async()
            .await;

        let record = client(server.url()).get_vehicle("nope").await.unwrap();
        assert!(record.is_none());
    }

    #[tokio::test]
    async fn get_vehicle_images_sorted_by_order() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", Matcher::Regex(r"^/appTEST/Vehicle(%20| )Images$".into()))
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("filterByFormula".into(), "{VIN} = 'W1K'".into()),
                Matcher::UrlEncoded("sort[0][field]".into(), "Order".into()),
                Matcher::UrlEncoded("sort[0][direction]".into(), "asc".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"{"records":[
                    {"id":"img1","fields":{"Vehicle ID":"W1K","Image Type":"Front","Image URL":"https://dl.airtable.com/f.jpg","Order":1}},
                    {"id":"img2","fields":{"Vehicle ID":"W1K","Image Type":"Rear","Image URL":"https://dl.airtable.com/r.jpg","Order":2}}
                ]}"#,
            )
            .create_async()
            .await;

        let images = client(server.url()).get_vehicle_images("W1K").await.unwrap();

        mock.assert_async().await;
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].image_type, "Front");
        assert_eq!(images[1].image_url, "https://dl.airtable.com/r.jpg");
    }

    #[tokio::test]
    async fn list_vehicles_follows_offsets() {
        let mut server = Server::new_async().await;
        let first = server
            .mock("GET", "/appTEST/Vehicles")
            .match_query(Matcher::Regex("^filterByFormula".into()))
            .with_status(200)
            .with_body(r#"{"records":[{"id":"rec1","fields":{"VIN":"A"}}],"offset":"itr1"}"#)
            .expect(1)
            .create_async()
            .await;
        let second = server
            .mock("GET", "/appTEST/Vehicles")
            .match_query(Matcher::AllOf(vec![
                Matcher::Regex("^offset=itr1".into()),
                Matcher::UrlEncoded("filterByFormula".into(), "{Status} = 'Active'".into()),
                Matcher::UrlEncoded("sort[0][direction]".into(), "desc".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"records":[{"id":"rec2","fields":{"VIN":"B"}}]}"#)
            .expect(1)
            .create_async()
            .await;

        let vehicles = client(server.url())
            .list_vehicles(VehicleStatus::Active)
            .await
            .unwrap();

        first.assert_async().await;
        second.assert_async().await;
        let ids: Vec<&str> = vehicles.iter().map(|record| record.id.as_str()).collect();
        assert_eq!(ids, ["rec1", "rec2"]);
    }

    #[tokio::test]
    async fn repeated_offset_stops_pagination() {
        let mut server = Server::new_async().await;
        let first = server
            .mock("GET", "/appTEST/Vehicles")
            .match_query(Matcher::Regex("^filterByFormula".into()))
            .with_status(200)
            .with_body(r#"{"records":[{"id":"rec1","fields":{"VIN":"A"}}],"offset":"same"}"#)
            .expect(1)
            .create_async()
            .await;
        let again = server
            .mock("GET", "/appTEST/Vehicles")
            .match_query(Matcher::Regex("^offset=same".into()))
            .with_status(200)
            .with_body(r#"{"records":[{"id":"rec2","fields":{"VIN":"B"}}],"offset":"same"}"#)
            .expect(1)
            .create_async()
            .await;

        let vehicles = client(server.url())
            .list_vehicles(VehicleStatus::Active)
            .await
            .unwrap();

        first.assert_async().await;
        again.assert_async().await;
        assert_eq!(vehicles.len(), 2);
    }

    #[tokio::test]
    async fn pagination_stops_at_page_limit() {
        let mut server = Server::new_async().await;
        let first = server
            .mock("GET", "/appTEST/Vehicles")
            .match_query(Matcher::Regex("^filterByFormula".into()))
            .with_status(200)
            .with_body(r#"{"records":[{"id":"rec1","fields":{}}],"offset":"itr1"}"#)
            .expect(1)
            .create_async()
            .await;
        let second = server
            .mock("GET", "/appTEST/Vehicles")
            .match_query(Matcher::Regex("^offset=itr1".into()))
            .with_status(200)
            .with_body(r#"{"records":[{"id":"rec2","fields":{}}],"offset":"itr2"}"#)
            .expect(1)
            .create_async()
            .await;
        let third = server
            .mock("GET", "/appTEST/Vehicles")
            .match_query(Matcher::Regex("^offset=itr2".into()))
            .with_status(200)
            .with_body(r#"{"records":[{"id":"rec3","fields":{}}]}"#)
            .expect(0)
            .create_async()
            .await;

        let mut airtable = client(server.url());
        airtable.max_pages = 2;
        let vehicles = airtable.list_vehicles(VehicleStatus::Active).await.unwrap();

        first.assert_async().await;
        second.assert_async().await;
        third.assert_async().await;
        let ids: Vec<&str> = vehicles.iter().map(|record| record.id.as_str()).collect();
        assert_eq!(ids, ["rec1", "rec2"]);
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/appTEST/Vehicles")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"error":{"type":"AUTHENTICATION_REQUIRED","message":"Authentication required"}}"#)
            .create_async()
            .await;

        let err = client(server.url()).get_vehicle("W1K").await.unwrap_err();
        match err {
            RecordError::Status { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Authentication required");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/appTEST/Vehicles")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>oops</html>")
            .create_async()
            .await;

        let err = client(server.url()).get_vehicle("W1K").await.unwrap_err();
        assert!(matches!(err, RecordError::Decode(_)));
    }

    #[tokio::test]
    async fn create_vehicle_forces_active_and_stamps() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/appTEST/Vehicles")
            .match_header("authorization", "Bearer key123")
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#""Make":"BMW""#.into()),
                Matcher::Regex(r#""Status":"Active""#.into()),
                Matcher::Regex(r#""Created":""#.into()),
                Matcher::Regex(r#""Updated":""#.into()),
            ]))
            .with_status(200)
            .with_body(r#"{"records":[{"id":"recNew","fields":{"Make":"BMW","Status":"Active"}}]}"#)
            .create_async()
            .await;

        let fields = VehicleAttributes {
            make: Some("BMW".into()),
            status: Some(VehicleStatus::Sold),
            ..Default::default()
        };
        let record = client(server.url()).create_vehicle(fields).await.unwrap().unwrap();

        mock.assert_async().await;
        assert_eq!(record.id, "recNew");
        assert_eq!(record.fields.status, Some(VehicleStatus::Active));
    }

    #[tokio::test]
    async fn update_vehicle_patches_by_record_id() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PATCH", "/appTEST/Vehicles")
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#""id":"rec9""#.into()),
                Matcher::Regex(r#""Mileage":12000"#.into()),
                Matcher::Regex(r#""Updated":""#.into()),
            ]))
            .with_status(200)
            .with_body(r#"{"records":[{"id":"rec9","fields":{"Mileage":12000}}]}"#)
            .create_async()
            .await;

        let fields = VehicleAttributes {
            mileage: Some(12000),
            ..Default::default()
        };
        let record = client(server.url())
            .update_vehicle("rec9", fields)
            .await
            .unwrap()
            .unwrap();

        mock.assert_async().await;
        assert_eq!(record.fields.mileage, Some(12000));
    }

    #[tokio::test]
    async fn add_vehicle_image_returns_fields() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", Matcher::Regex(r"^/appTEST/Vehicle(%20| )Images$".into()))
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#""VIN":"W1K""#.into()),
                Matcher::Regex(r#""Image Type":"Tires""#.into()),
            ]))
            .with_status(200)
            .with_body(r#"{"records":[{"id":"img9","fields":{"VIN":"W1K","Vehicle ID":"W1K","Image Type":"Tires","Image URL":"/t.jpg","Order":4}}]}"#)
            .create_async()
            .await;

        let image = VehicleImageRecord {
            vin: Some("W1K".into()),
            vehicle_id: "W1K".into(),
            image_type: "Tires".into(),
            image_url: "/t.jpg".into(),
            alt_text: None,
            order: Some(4),
        };
        let created = client(server.url()).add_vehicle_image(image.clone()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(created, Some(image));
    }
}
