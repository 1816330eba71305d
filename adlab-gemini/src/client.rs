use crate::credential::Credential;
use crate::error::*;
use crate::generation::ContentBuilder;
use crate::model::Model;
use crate::video::VideoBuilder;
use reqwest::{
    Client, ClientBuilder, RequestBuilder, Response,
    header::{HeaderMap, HeaderName, HeaderValue},
};
use snafu::ResultExt;
use std::sync::{Arc, LazyLock};
use tracing::Level;
use url::Url;

static DEFAULT_BASE_URL: LazyLock<Url> = LazyLock::new(|| {
    Url::parse("https://generativelanguage.googleapis.com/v1beta/")
        .expect("unreachable error: failed to parse default base URL")
});

/// Internal client for making requests to the Gemini API.
#[derive(Debug)]
pub(crate) struct GeminiClient {
    pub model: Model,
    http_client: Client,
    base_url: Url,
    credential: Credential,
}

impl GeminiClient {
    fn with_base_url(
        client_builder: ClientBuilder,
        model: Model,
        base_url: Url,
        credential: Credential,
    ) -> Result<Self, Error> {
        let mut key_header =
            HeaderValue::from_str(credential.expose()).context(InvalidApiKeySnafu)?;
        // Keeps the key out of the http client's Debug output.
        key_header.set_sensitive(true);
        let headers =
            HeaderMap::from_iter([(HeaderName::from_static("x-goog-api-key"), key_header)]);

        let http_client =
            client_builder.default_headers(headers).build().context(PerformRequestNewSnafu)?;

        Ok(Self { model, http_client, base_url, credential })
    }

    /// Check the response status code and return an error if it is not successful
    #[tracing::instrument(skip_all, err)]
    async fn check_response(response: Response) -> Result<Response, Error> {
        let status = response.status();
        if !status.is_success() {
            let description = response.text().await.ok();
            BadResponseSnafu { code: status.as_u16(), description }.fail()
        } else {
            Ok(response)
        }
    }

    /// Performs an HTTP request to the Gemini API with standardized error
    /// handling: build with the provided builder function, send, check the
    /// status code, then deserialize with the provided deserializer.
    #[tracing::instrument(skip_all)]
    pub(crate) async fn perform_request<
        B: FnOnce(&Client) -> RequestBuilder,
        D: AsyncFn(Response) -> Result<T, Error>,
        T,
    >(
        &self,
        builder: B,
        deserializer: D,
    ) -> Result<T, Error> {
        let request = builder(&self.http_client);
        tracing::debug!("request built successfully");
        let response = request.send().await.context(PerformRequestNewSnafu)?;
        tracing::debug!("response received successfully");
        let response = Self::check_response(response).await?;
        tracing::debug!("response ok");
        deserializer(response).await
    }

    /// Perform a GET request and deserialize the JSON response.
    #[tracing::instrument(skip(self), fields(request.type = "get", request.url = %url))]
    pub(crate) async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: Url,
    ) -> Result<T, Error> {
        self.perform_request(|c| c.get(url), async |r| r.json().await.context(DecodeResponseSnafu))
            .await
    }

    /// Perform a POST request with JSON body and deserialize the JSON response.
    #[tracing::instrument(skip(self, body), fields(request.type = "post", request.url = %url))]
    pub(crate) async fn post_json<Req: serde::Serialize, Res: serde::de::DeserializeOwned>(
        &self,
        url: Url,
        body: &Req,
    ) -> Result<Res, Error> {
        self.perform_request(
            |c| c.post(url).json(body),
            async |r| r.json().await.context(DecodeResponseSnafu),
        )
        .await
    }

    /// Download raw bytes from an absolute result locator, authenticating
    /// with the client credential as a query parameter.
    ///
    /// The provider's result locators require the key inline; the caller is
    /// responsible for never exposing the keyed URL to a UI surface.
    #[tracing::instrument(skip(self), fields(request.type = "download"), err)]
    pub(crate) async fn download_bytes(&self, locator: &str) -> Result<Vec<u8>, Error> {
        let mut url = Url::parse(locator).context(UrlParseSnafu)?;
        url.query_pairs_mut().append_pair("key", self.credential.expose());

        self.perform_request(
            |c| c.get(url),
            async |r| r.bytes().await.context(DecodeResponseSnafu).map(|bytes| bytes.to_vec()),
        )
        .await
    }

    /// Build a URL with the given suffix
    #[tracing::instrument(skip(self), ret(level = Level::DEBUG))]
    pub(crate) fn build_url_with_suffix(&self, suffix: &str) -> Result<Url, Error> {
        self.base_url.join(suffix).context(ConstructUrlSnafu { suffix: suffix.to_string() })
    }

    /// Build a `{model}:{endpoint}` URL for the configured model
    pub(crate) fn build_url(&self, endpoint: &str) -> Result<Url, Error> {
        let suffix = format!("{}:{endpoint}", self.model);
        self.build_url_with_suffix(&suffix)
    }
}

/// A builder for the `Gemini` client.
///
/// # Examples
///
/// ```no_run
/// use adlab_gemini::{Credential, GeminiBuilder, Model};
///
/// # fn run() -> Result<(), adlab_gemini::Error> {
/// let gemini = GeminiBuilder::new(Credential::new("YOUR_API_KEY"))
///     .with_model(Model::Gemini25FlashImage)
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct GeminiBuilder {
    model: Model,
    client_builder: ClientBuilder,
    base_url: Url,
    credential: Credential,
}

impl GeminiBuilder {
    /// Creates a new `GeminiBuilder` bound to the given credential.
    pub fn new(credential: Credential) -> Self {
        Self {
            model: Model::default(),
            client_builder: ClientBuilder::default(),
            base_url: DEFAULT_BASE_URL.clone(),
            credential,
        }
    }

    /// Sets the model for the client.
    pub fn with_model(mut self, model: impl Into<Model>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets a custom `reqwest::ClientBuilder`.
    pub fn with_http_client(mut self, client_builder: ClientBuilder) -> Self {
        self.client_builder = client_builder;
        self
    }

    /// Sets a custom base URL for the API.
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    /// Builds the `Gemini` client.
    pub fn build(self) -> Result<Gemini, Error> {
        if self.credential.is_empty() {
            return MissingApiKeySnafu.fail();
        }
        Ok(Gemini {
            client: Arc::new(GeminiClient::with_base_url(
                self.client_builder,
                self.model,
                self.base_url,
                self.credential,
            )?),
        })
    }
}

/// Client for the Gemini API.
///
/// Cloning is cheap (shared inner client). Construction is pure
/// configuration — no connection is held — so a fresh `Gemini` may be built
/// per call; a credential rotated mid-session takes effect on the next
/// construction.
#[derive(Debug, Clone)]
pub struct Gemini {
    client: Arc<GeminiClient>,
}

impl Gemini {
    /// Create a new client with the default model.
    pub fn new(credential: Credential) -> Result<Self, Error> {
        Self::with_model(credential, Model::default())
    }

    /// Create a new client with the specified model.
    pub fn with_model(credential: Credential, model: impl Into<Model>) -> Result<Self, Error> {
        GeminiBuilder::new(credential).with_model(model).build()
    }

    /// Start building a content generation request.
    pub fn generate_content(&self) -> ContentBuilder {
        ContentBuilder::new(self.client.clone())
    }

    /// Start building a long-running video generation request.
    pub fn generate_video(&self) -> VideoBuilder {
        VideoBuilder::new(self.client.clone())
    }

    /// Re-fetch a long-running video operation by its handle name.
    pub async fn get_video_operation(
        &self,
        name: &str,
    ) -> Result<crate::video::VideoOperation, Error> {
        let url = self.client.build_url_with_suffix(name)?;
        self.client.get_json(url).await
    }

    /// Download the bytes behind a result locator, authenticated with the
    /// client credential.
    pub async fn download(&self, locator: &str) -> Result<Vec<u8>, Error> {
        self.client.download_bytes(locator).await
    }
}
