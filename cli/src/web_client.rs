use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use sprout_core::{CareProfile, Error, NewCareProfile, NewPlant, Plant, PlantApi};

use crate::model::ListResponse;

/// REST client for the plant backend
pub struct HttpPlantApi {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpPlantApi {
    pub fn new(base_url: &str, token: Option<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("sprout/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.url(endpoint));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, Error> {
        let response = request
            .send()
            .await
            .map_err(|e| Error::Api(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        if body.trim().is_empty() {
            Err(Error::Api(format!("Request failed: {}", status)))
        } else {
            Err(Error::Api(body))
        }
    }

    async fn json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, Error> {
        self.send(request)
            .await?
            .json::<T>()
            .await
            .map_err(|e| Error::Api(format!("Invalid response: {}", e)))
    }
}

#[async_trait]
impl PlantApi for HttpPlantApi {
    async fn list_plants(&self) -> Result<Vec<Plant>, Error> {
        let list: ListResponse<Plant> = self.json(self.request(Method::GET, "/plants/")).await?;
        Ok(list.into_items())
    }

    async fn create_plant(&self, plant: &NewPlant) -> Result<(), Error> {
        self.send(self.request(Method::POST, "/userplants/").json(plant))
            .await?;
        Ok(())
    }

    async fn delete_plant(&self, id: i64) -> Result<(), Error> {
        self.send(self.request(Method::DELETE, &format!("/userplants/{}/", id)))
            .await?;
        Ok(())
    }

    async fn mark_watered(&self, id: i64) -> Result<(), Error> {
        self.send(self.request(Method::POST, &format!("/userplants/{}/water/", id)))
            .await?;
        Ok(())
    }

    async fn list_care_profiles(&self) -> Result<Vec<CareProfile>, Error> {
        let list: ListResponse<CareProfile> =
            self.json(self.request(Method::GET, "/plant-care/")).await?;
        Ok(list.into_items())
    }

    async fn create_care_profile(&self, profile: &NewCareProfile) -> Result<CareProfile, Error> {
        self.json(self.request(Method::POST, "/plant-care/").json(profile))
            .await
    }
}
