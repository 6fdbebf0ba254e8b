use super::{
	models::{self, ListItem, Payload, RawCategory, RawHall, RawMovie, RawSnack, RawUser},
	ApiError, CinemaApi, ListQuery, Resource
};
use crate::CLIENT;
use async_trait::async_trait;
use log::{debug, info};
use reqwest::{Client, Method, RequestBuilder};

/// REST client of the Cinemate backend.
#[derive(Clone, Debug)]
pub struct ApiClient {
	origin: String,
	token: Option<String>,
	http: Client
}

impl ApiClient {
	pub fn new(origin: &str, token: Option<String>) -> Self {
		Self::with_client(origin, token, CLIENT.clone())
	}

	pub fn with_client(origin: &str, token: Option<String>, http: Client) -> Self {
		Self {
			origin: origin.trim_end_matches('/').to_owned(),
			token,
			http
		}
	}

	fn url(&self, resource: Resource, id: Option<&str>) -> String {
		match id {
			Some(id) => format!("{}/{}/{id}", self.origin, resource.path()),
			None => format!("{}/{}", self.origin, resource.path())
		}
	}

	fn request(&self, method: Method, url: String) -> RequestBuilder {
		debug!("{method} {url}");
		let builder = self.http.request(method, url);
		match &self.token {
			Some(token) => builder.bearer_auth(token),
			None => builder
		}
	}

	async fn send(&self, builder: RequestBuilder) -> Result<Vec<u8>, ApiError> {
		let response = builder.send().await?;
		let status = response.status();
		let body = response.bytes().await?;
		if !status.is_success() {
			return Err(ApiError::from_status(status, &body));
		}
		Ok(body.to_vec())
	}
}

fn decode_list(resource: Resource, body: &[u8]) -> serde_json::Result<Vec<ListItem>> {
	match resource {
		Resource::Movies => models::decode_list::<RawMovie>(body),
		Resource::Snacks | Resource::Drinks => models::decode_list::<RawSnack>(body),
		Resource::Halls => models::decode_list::<RawHall>(body),
		Resource::Categories => models::decode_list::<RawCategory>(body),
		Resource::Users => models::decode_list::<RawUser>(body)
	}
}

fn decode_one(resource: Resource, body: &[u8]) -> serde_json::Result<ListItem> {
	match resource {
		Resource::Movies => models::decode_one::<RawMovie>(body),
		Resource::Snacks | Resource::Drinks => models::decode_one::<RawSnack>(body),
		Resource::Halls => models::decode_one::<RawHall>(body),
		Resource::Categories => models::decode_one::<RawCategory>(body),
		Resource::Users => models::decode_one::<RawUser>(body)
	}
}

#[async_trait]
impl CinemaApi for ApiClient {
	async fn list(&self, resource: Resource, query: ListQuery) -> Result<Vec<ListItem>, ApiError> {
		let mut params: Vec<(&str, String)> = Vec::new();
		let search = query.search.filter(|search| !search.trim().is_empty());
		if let Some(snack_type) = resource.snack_type() {
			params.push(("SnakType", snack_type.to_owned()));
			params.push(("PageIndex", "1".to_owned()));
			params.push(("PageSize", query.page_size.to_string()));
			params.push(("SearchQuery", search.unwrap_or_default()));
		} else if let Some(search) = search {
			params.push(("SearchQuery", search));
		}
		let builder = self
			.request(Method::GET, self.url(resource, None))
			.query(&params);
		let body = self.send(builder).await?;
		let items = decode_list(resource, &body)?;
		info!("fetched {} {}", items.len(), resource.title());
		Ok(items)
	}

	async fn get(&self, resource: Resource, id: String) -> Result<ListItem, ApiError> {
		let builder = self.request(Method::GET, self.url(resource, Some(&id)));
		let body = self.send(builder).await?;
		Ok(decode_one(resource, &body)?)
	}

	async fn count(&self, resource: Resource) -> Result<u64, ApiError> {
		let builder = self.request(Method::GET, self.url(resource, Some("count")));
		let body = self.send(builder).await?;
		Ok(models::decode_count(&body)?)
	}

	async fn create(&self, resource: Resource, payload: Payload) -> Result<(), ApiError> {
		info!("create {}", resource.noun());
		let builder = self
			.request(Method::POST, self.url(resource, None))
			.json(&payload);
		self.send(builder).await?;
		Ok(())
	}

	async fn update(&self, resource: Resource, id: String, payload: Payload) -> Result<(), ApiError> {
		info!("update {} {id:?}", resource.noun());
		let builder = self
			.request(Method::PUT, self.url(resource, Some(&id)))
			.json(&payload);
		self.send(builder).await?;
		Ok(())
	}

	async fn delete(&self, resource: Resource, id: String) -> Result<(), ApiError> {
		info!("delete {} {id:?}", resource.noun());
		let builder = self.request(Method::DELETE, self.url(resource, Some(&id)));
		self.send(builder).await?;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::api::Failure;
	use mockito::{Matcher, Server};
	use serde_json::json;

	fn client(server: &Server, token: Option<&str>) -> ApiClient {
		ApiClient::with_client(&server.url(), token.map(str::to_owned), Client::new())
	}

	#[tokio::test]
	async fn snack_list_sends_paging_params() {
		let mut server = Server::new_async().await;
		let mock = server
			.mock("GET", "/api/Snak")
			.match_query(Matcher::AllOf(vec![
				Matcher::UrlEncoded("SnakType".into(), "Drink".into()),
				Matcher::UrlEncoded("PageIndex".into(), "1".into()),
				Matcher::UrlEncoded("PageSize".into(), "500".into()),
				Matcher::UrlEncoded("SearchQuery".into(), "cola".into())
			]))
			.with_header("content-type", "application/json")
			.with_body(json!([{ "id": 1, "name": "Cola", "price": 2.5 }]).to_string())
			.create_async()
			.await;

		let items = client(&server, None)
			.list(
				Resource::Drinks,
				ListQuery {
					search: Some("cola".into()),
					page_size: 500
				}
			)
			.await
			.unwrap();
		mock.assert_async().await;
		assert_eq!(items.len(), 1);
		assert_eq!(items[0].name, "Cola");
	}

	#[tokio::test]
	async fn token_is_sent_as_bearer() {
		let mut server = Server::new_async().await;
		let mock = server
			.mock("GET", "/api/User")
			.match_header("authorization", "Bearer secret")
			.with_body(json!([{ "_id": "a1", "fullName": "Ada" }]).to_string())
			.create_async()
			.await;

		let items = client(&server, Some("secret"))
			.list(Resource::Users, ListQuery::default())
			.await
			.unwrap();
		mock.assert_async().await;
		assert_eq!(items[0].id, "a1");
	}

	#[tokio::test]
	async fn unauthorized_is_classified_as_auth() {
		let mut server = Server::new_async().await;
		let _mock = server
			.mock("GET", "/api/Hall")
			.with_status(401)
			.create_async()
			.await;

		let err = client(&server, Some("expired"))
			.list(Resource::Halls, ListQuery::default())
			.await
			.unwrap_err();
		assert_eq!(err.classify(), Failure::Auth);
	}

	#[tokio::test]
	async fn server_error_is_generic_failure() {
		let mut server = Server::new_async().await;
		let _mock = server
			.mock("DELETE", "/api/MovieType/9")
			.with_status(500)
			.with_body("still in use")
			.create_async()
			.await;

		let err = client(&server, None)
			.delete(Resource::Categories, "9".into())
			.await
			.unwrap_err();
		assert!(matches!(err.classify(), Failure::Other(msg) if msg.contains("still in use")));
	}

	#[tokio::test]
	async fn create_and_update_send_json() {
		let mut server = Server::new_async().await;
		let create = server
			.mock("POST", "/api/Hall")
			.match_body(Matcher::Json(json!({ "name": "IMAX", "capacity": 300 })))
			.with_status(201)
			.create_async()
			.await;
		let update = server
			.mock("PUT", "/api/MovieType/4")
			.match_body(Matcher::Json(json!({ "name": "Drama" })))
			.with_status(204)
			.create_async()
			.await;

		let api = client(&server, None);
		api.create(
			Resource::Halls,
			Payload::Hall {
				name: "IMAX".into(),
				capacity: Some(300)
			}
		)
		.await
		.unwrap();
		api.update(
			Resource::Categories,
			"4".into(),
			Payload::Category {
				name: "Drama".into()
			}
		)
		.await
		.unwrap();
		create.assert_async().await;
		update.assert_async().await;
	}

	#[tokio::test]
	async fn snack_by_id_and_count() {
		let mut server = Server::new_async().await;
		let _one = server
			.mock("GET", "/api/Snak/12")
			.with_body(json!({ "id": 12, "name": "Nachos", "image": "Images/nachos.png" }).to_string())
			.create_async()
			.await;
		let _count = server
			.mock("GET", "/api/Snak/count")
			.with_body("31")
			.create_async()
			.await;

		let api = client(&server, None);
		let item = api.get(Resource::Snacks, "12".into()).await.unwrap();
		assert_eq!(item.name, "Nachos");
		assert_eq!(api.count(Resource::Snacks).await.unwrap(), 31);
	}
}
