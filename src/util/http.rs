/* Copyright © 2024-2025 Adam Train <adam@trainrelay.net>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 */
use crate::error::BackendError;
use reqwest::blocking::{RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("cafire/", env!("CARGO_PKG_VERSION"));

/// Thin blocking JSON client bound to one base URL. Each instance keeps its
/// own cookie jar, so a fresh client is a fresh session.
pub struct Client {
	client: reqwest::blocking::Client,
	base_url: String,
}

impl Client {
	pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
		Client::build(base_url, timeout, HeaderMap::new())
	}

	/// A client that sends `Authorization: Bearer <token>` on every request.
	pub fn with_bearer(
		base_url: &str,
		timeout: Duration,
		token: &str,
	) -> Result<Self, BackendError> {
		let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
			.map_err(|_| {
				BackendError::Rejected("token is not a valid header".to_owned())
			})?;
		value.set_sensitive(true);

		let mut headers = HeaderMap::new();
		headers.insert(AUTHORIZATION, value);
		Client::build(base_url, timeout, headers)
	}

	fn build(
		base_url: &str,
		timeout: Duration,
		headers: HeaderMap,
	) -> Result<Self, BackendError> {
		let client = reqwest::blocking::Client::builder()
			.cookie_store(true)
			.user_agent(USER_AGENT)
			.default_headers(headers)
			.timeout(timeout)
			.build()?;

		Ok(Client {
			client,
			base_url: base_url.trim_end_matches('/').to_owned(),
		})
	}

	pub fn url(&self, endpoint: &str) -> String {
		format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
	}

	/// Sends a GET and decodes the JSON body. Errors on non-2xx responses.
	pub fn get<Q, R>(
		&self,
		endpoint: &str,
		query_params: Option<&Q>,
	) -> Result<R, BackendError>
	where
		Q: Serialize + ?Sized,
		R: for<'de> Deserialize<'de>,
	{
		let mut request = self.request(Method::GET, endpoint);
		if let Some(query_params) = query_params {
			request = request.query(query_params);
		}
		decode(send(request)?)
	}

	/// Sends a GET and discards the body. Used to pick up cookies.
	pub fn touch(&self, endpoint: &str) -> Result<(), BackendError> {
		send(self.request(Method::GET, endpoint))?;
		Ok(())
	}

	/// POSTs a url-encoded form and decodes the JSON reply.
	pub fn post_form<F, R>(&self, endpoint: &str, form: &F) -> Result<R, BackendError>
	where
		F: Serialize + ?Sized,
		R: for<'de> Deserialize<'de>,
	{
		decode(send(self.request(Method::POST, endpoint).form(form))?)
	}

	/// POSTs a JSON body, or an empty one, and decodes the JSON reply.
	pub fn post_json<B, R>(
		&self,
		endpoint: &str,
		body: Option<&B>,
	) -> Result<R, BackendError>
	where
		B: Serialize + ?Sized,
		R: for<'de> Deserialize<'de>,
	{
		let mut request = self.request(Method::POST, endpoint);
		if let Some(body) = body {
			request = request.json(body);
		}
		decode(send(request)?)
	}

	fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
		let url = self.url(endpoint);
		debug!(%method, %url, "sending request");
		self.client.request(method, url)
	}
}

fn send(request: RequestBuilder) -> Result<Response, BackendError> {
	let response = request.send()?;

	let status = response.status();
	if !status.is_success() {
		let body = response.text().unwrap_or_default();
		return Err(BackendError::Status {
			status: status.as_u16(),
			body,
		});
	}

	Ok(response)
}

fn decode<R>(response: Response) -> Result<R, BackendError>
where
	R: for<'de> Deserialize<'de>,
{
	let text = response.text()?;
	serde_json::from_str(&text).map_err(|e| BackendError::Decode(e.to_string()))
}
