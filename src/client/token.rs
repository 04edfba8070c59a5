//! Session token acquisition.

// self
use crate::{
	_prelude::*,
	api::{Endpoint, TokenResponse},
	client::StoreClient,
	http::{HttpRequest, StoreHttpClient},
	model::SessionToken,
	obs::{self, Stage},
};

impl<C> StoreClient<C>
where
	C: ?Sized + StoreHttpClient,
{
	/// Acquires the session token that scopes every later call of the run.
	pub async fn fetch_token(&self) -> Result<SessionToken> {
		obs::observe(Stage::Token, self.request_token()).await
	}

	async fn request_token(&self) -> Result<SessionToken> {
		let url = self.endpoint_url(Endpoint::Token, &[])?;

		self.call::<TokenResponse>(HttpRequest::get(url)).await
	}
}
