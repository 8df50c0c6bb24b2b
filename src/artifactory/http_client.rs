use crate::artifactory::Error;
use async_trait::async_trait;
use http_body_util::Empty;
use hyper::body::{Bytes, Incoming};
use hyper::header::LOCATION;
use hyper::{Request, Response};
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use rustls::RootCertStore;
use rustls_pki_types::pem::PemObject;
use rustls_pki_types::CertificateDer;
use std::fmt::Debug;
use tracing::error;

#[async_trait]
pub trait HttpClient: Send + Sync + Debug {
    async fn request(&self, request: Request<Empty<Bytes>>) -> Result<Response<Incoming>, Error>;
}

#[derive(Clone, Debug)]
struct HttpsClient {
    max_redirect: u8,
    client: Client<HttpsConnector<HttpConnector>, Empty<Bytes>>,
}

#[async_trait]
impl HttpClient for HttpsClient {
    async fn request(
        &self,
        mut request: Request<Empty<Bytes>>,
    ) -> Result<Response<Incoming>, Error> {
        let mut redirect_count = 0;

        loop {
            let response = self.client.request(request.clone()).await.map_err(|err| {
                error!("Storage API request failed: {err}");
                Error::Http(err.to_string())
            })?;

            if response.status().is_redirection() {
                let Some(new_location) = response
                    .headers()
                    .get(LOCATION)
                    .and_then(|value| value.to_str().ok())
                else {
                    return Err(Error::Http(
                        "Redirect response without location header".to_string(),
                    ));
                };

                *request.uri_mut() = new_location
                    .parse()
                    .map_err(|err| Error::Http(format!("Invalid redirect location: {err}")))?;

                if redirect_count >= self.max_redirect {
                    error!("Too many redirections from the storage API");
                    return Err(Error::Http("Too many redirections".to_string()));
                }

                redirect_count += 1;
                continue;
            }

            return Ok(response);
        }
    }
}

pub struct HttpClientBuilder {
    server_ca_bundle: Option<String>,
    max_redirect: u8,
}

impl HttpClientBuilder {
    pub fn new() -> Self {
        Self {
            server_ca_bundle: None,
            max_redirect: 5,
        }
    }

    pub fn set_server_ca_bundle(mut self, server_ca_bundle: Option<String>) -> Self {
        self.server_ca_bundle = server_ca_bundle;
        self
    }

    pub fn set_max_redirect(mut self, max_redirect: u8) -> Self {
        self.max_redirect = max_redirect;
        self
    }

    pub fn build(self) -> Result<Box<dyn HttpClient>, Error> {
        let mut root_store = RootCertStore::empty();
        let certs = if let Some(server_ca_bundle) = self.server_ca_bundle {
            CertificateDer::pem_file_iter(server_ca_bundle)?.collect::<Result<Vec<_>, _>>()?
        } else {
            rustls_native_certs::load_native_certs().expect("could not load platform certs")
        };
        root_store.add_parsable_certificates(certs);

        let tls_config = rustls::ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth();

        let connector = hyper_rustls::HttpsConnectorBuilder::new()
            .with_tls_config(tls_config)
            .https_or_http()
            .enable_http1()
            .build();

        let client = HttpsClient {
            max_redirect: self.max_redirect,
            client: Client::builder(TokioExecutor::new()).build(connector),
        };
        Ok(Box::new(client))
    }
}
