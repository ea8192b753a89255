use std::time::Duration;

use reqwest::{multipart, Client, Url};

use super::{Deserialize, Serialize};

pub const IPFS_LOG_TARGET: &str = "IPFS";

// ipfs max retry times
const IPFS_MAX_RETRY_TIMES: usize = 5;
const TIME_OUT: Duration = Duration::from_secs(5);
const IPFS_ADD_PATH: &str = "api/v0/add";
const IPFS_SCHEME_PREFIX: &str = "ipfs://";

#[derive(Eq, PartialEq, Clone, Debug, Deserialize, Serialize)]
pub struct IpfsConfig {
	// e.g. https://ipfs.infura.io:5001
	pub base_url: String,
	// public gateway used to resolve content references for download,
	// e.g. https://ipfs.io
	pub gateway: String,
}

#[derive(Default, Eq, PartialEq, Clone, Debug)]
pub struct IpfsClient {
	// e.g. https://ipfs.infura.io:5001/api/v0/add
	add_url_prefix: String,
	gateway: String,
}

// response of the `add` endpoint
#[derive(Debug, Deserialize)]
struct AddResponse {
	#[serde(rename = "Hash")]
	hash: String,
}

impl IpfsClient {
	pub fn new(config: &IpfsConfig) -> Result<Self> {
		if !config.base_url.starts_with("https") {
			return Err(Error::InvalidIpfsHost)
		}
		// both urls must parse before any request is attempted
		Url::parse(&config.base_url)?;
		Url::parse(&config.gateway)?;
		let base = if config.base_url.ends_with('/') {
			config.base_url.to_owned()
		} else {
			config.base_url.to_owned() + "/"
		};
		Ok(IpfsClient {
			add_url_prefix: base + IPFS_ADD_PATH,
			gateway: config.gateway.trim_end_matches('/').to_owned(),
		})
	}

	/// Pin a dataset or annotation result and return its content reference.
	pub async fn upload(&self, bytes: Vec<u8>, file_name: &str) -> Result<String> {
		log::info!(
			target: IPFS_LOG_TARGET,
			"uploading {} ({} bytes) to ipfs",
			file_name,
			bytes.len()
		);

		let client = Client::builder().connect_timeout(TIME_OUT).build()?;
		let part = multipart::Part::bytes(bytes).file_name(file_name.to_owned());
		let form = multipart::Form::new().part("file", part);

		let response = client.post(&self.add_url_prefix).multipart(form).send().await?;
		let added: AddResponse = response.json().await?;
		let cid = strip_scheme(&added.hash).to_owned();

		log::info!(target: IPFS_LOG_TARGET, "upload done, cid: {:}", cid);
		Ok(cid)
	}

	/// Fetch content through the public gateway.
	pub async fn fetch(&self, cid: &str) -> Result<Vec<u8>> {
		let url = self.gateway_url(cid);
		log::info!(target: IPFS_LOG_TARGET, "start fetching ipfs cid: {:?}", cid);

		let client = Client::builder().connect_timeout(TIME_OUT).build()?;
		for i in 0..IPFS_MAX_RETRY_TIMES {
			let maybe_response = client.get(&url).send().await;
			match maybe_response {
				Ok(r) => {
					let body = r.bytes().await?;
					return Ok(body.to_vec())
				},
				Err(e) => {
					if e.is_timeout() && i < (IPFS_MAX_RETRY_TIMES - 1) {
						log::warn!(
							target: IPFS_LOG_TARGET,
							"ipfs gateway fetch timeout! retry: {:} ...",
							i + 1
						);
						continue
					}
					log::error!(
						target: IPFS_LOG_TARGET,
						"ipfs gateway fetch error. reason: {:?}",
						e
					);
					Err(e)?
				},
			}
		}
		Err(Error::GatewayUnreachable(url))
	}

	// public gateway convention: https://<gateway>/ipfs/<cid>
	pub fn gateway_url(&self, cid: &str) -> String {
		format!("{}/ipfs/{}", self.gateway, strip_scheme(cid))
	}
}

// content references may arrive with an `ipfs://` prefix; it is stripped
// before storage or display
pub fn strip_scheme(reference: &str) -> &str {
	reference.strip_prefix(IPFS_SCHEME_PREFIX).unwrap_or(reference)
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
	#[error("Just allow specified ipfs host")]
	InvalidIpfsHost,

	#[error("Request IPFS error, reason: {0}")]
	HttpError(#[from] reqwest::Error),

	#[error("Assembly Url error, reason: {0}")]
	UrlError(#[from] url::ParseError),

	#[error("IPFS gateway unreachable: {0}")]
	GatewayUnreachable(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
	use super::*;

	fn client() -> IpfsClient {
		let config = IpfsConfig {
			base_url: "https://ipfs.infura.io:5001".to_owned(),
			gateway: "https://ipfs.io/".to_owned(),
		};
		IpfsClient::new(&config).unwrap()
	}

	#[test]
	fn client_should_reject_plain_http_host() {
		let config = IpfsConfig {
			base_url: "http://ipfs.infura.io:5001".to_owned(),
			gateway: "https://ipfs.io".to_owned(),
		};
		assert!(IpfsClient::new(&config).is_err());
	}

	#[test]
	fn gateway_url_should_follow_convention() {
		let cid = "QmWSnVGex9CXd2ZWY3nfrb6Liax6f1r5aRZbBoECox1hVD";
		assert_eq!(client().gateway_url(cid), format!("https://ipfs.io/ipfs/{}", cid));
	}

	#[test]
	fn strip_scheme_should_remove_prefix_once() {
		assert_eq!(strip_scheme("ipfs://QmFoo"), "QmFoo");
		assert_eq!(strip_scheme("QmFoo"), "QmFoo");
	}
}
