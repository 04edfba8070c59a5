//! Category retrieval and the per-category magazine fan-out.
//!
//! [`StoreClient::fetch_magazines`] issues one call per category concurrently. Each call
//! returns its own buffer; the buffers are flattened only after every call has completed, so
//! a single failing category fails the whole fetch and no partial magazine set escapes.
//! Sibling calls still in flight when one fails are dropped with their results.

// crates.io
use futures::future;
// self
use crate::{
	_prelude::*,
	api::{CategoriesResponse, Endpoint, MagazinesResponse},
	client::StoreClient,
	http::{HttpRequest, StoreHttpClient},
	model::{Category, CategorySet, Magazine, SessionToken},
	obs::{self, Stage, StageSpan},
};

impl<C> StoreClient<C>
where
	C: ?Sized + StoreHttpClient,
{
	/// Retrieves the de-duplicated category set offered by the store.
	pub async fn fetch_categories(&self, token: &SessionToken) -> Result<CategorySet> {
		obs::observe(Stage::Categories, self.request_categories(token)).await
	}

	/// Retrieves the magazines of every category concurrently and flattens them.
	pub async fn fetch_magazines(
		&self,
		token: &SessionToken,
		categories: &CategorySet,
	) -> Result<Vec<Magazine>> {
		obs::observe(Stage::Magazines, self.request_magazines(token, categories)).await
	}

	async fn request_categories(&self, token: &SessionToken) -> Result<CategorySet> {
		let url = self.endpoint_url(Endpoint::Categories, &[token.expose()])?;
		let categories = self
			.call::<CategoriesResponse>(HttpRequest::get(url))
			.await?
			.into_iter()
			.collect::<CategorySet>();

		obs::record_count(Stage::Categories, categories.len());

		Ok(categories)
	}

	async fn request_magazines(
		&self,
		token: &SessionToken,
		categories: &CategorySet,
	) -> Result<Vec<Magazine>> {
		let buffers = future::try_join_all(
			categories.iter().map(|category| self.fetch_category_magazines(token, category)),
		)
		.await?;
		let magazines = buffers.into_iter().flatten().collect::<Vec<_>>();

		obs::record_count(Stage::Magazines, magazines.len());

		Ok(magazines)
	}

	async fn fetch_category_magazines(
		&self,
		token: &SessionToken,
		category: &Category,
	) -> Result<Vec<Magazine>> {
		let url = self.endpoint_url(Endpoint::Magazines, &[token.expose(), category.as_ref()])?;
		let span = StageSpan::category(category);
		let magazines =
			span.instrument(self.call::<MagazinesResponse>(HttpRequest::get(url))).await?;

		span.record_count(magazines.len());

		Ok(magazines)
	}
}

#[cfg(test)]
mod tests {
	// self
	// crates.io
	use tokio::sync::Barrier;
	// self
	use crate::{
		_preludet::*,
		api::Endpoint,
		client::StoreClient,
		error::TransportError,
		http::{HttpFuture, HttpMethod, HttpRequest, HttpResponse, StoreHttpClient},
		model::{CategorySet, SessionToken},
	};

	/// Holds every magazine reply until `Barrier::new(n)` sees `n` calls in flight.
	struct GatedStore {
		gate: Barrier,
	}
	impl StoreHttpClient for GatedStore {
		fn execute(&self, request: HttpRequest) -> HttpFuture<'_> {
			Box::pin(async move {
				self.gate.wait().await;

				let category = request
					.url
					.path_segments()
					.and_then(|mut segments| segments.next_back())
					.unwrap_or_default()
					.to_owned();
				let data = format!(
					r#"[{{"id":{},"name":"m","category":"{category}"}}]"#,
					category.len()
				);

				Ok(HttpResponse { status: 200, body: ok_envelope("t", &data).into_bytes() })
			})
		}
	}

	fn token() -> SessionToken {
		SessionToken::new("t").expect("Token fixture should be valid.")
	}

	#[tokio::test]
	async fn categories_are_deduplicated() {
		let transport = MockTransport::default()
			.get("/api/categories/t", ok_envelope("t", r#"["News","Sports","News"]"#));
		let categories = mock_client(transport)
			.fetch_categories(&token())
			.await
			.expect("Categories should be fetched.");

		assert_eq!(categories, ["News", "Sports"].into_iter().collect::<CategorySet>());
	}

	#[tokio::test]
	async fn magazines_fan_out_once_per_category_and_flatten() {
		let transport = Arc::new(
			MockTransport::default()
				.get(
					"/api/magazines/t/News",
					ok_envelope(
						"t",
						r#"[{"id":1,"name":"Daily","category":"News"},{"id":2,"name":"Weekly","category":"News"}]"#,
					),
				)
				.get(
					"/api/magazines/t/Home%20Decor",
					ok_envelope("t", r#"[{"id":3,"name":"Rooms","category":"Home Decor"}]"#),
				)
				.get("/api/magazines/t/Empty", ok_envelope("t", "[]")),
		);
		let categories = ["News", "Home Decor", "Empty"].into_iter().collect::<CategorySet>();
		let magazines = mock_client(transport.clone())
			.fetch_magazines(&token(), &categories)
			.await
			.expect("Magazines should be fetched.");
		let mut ids = magazines.iter().map(|magazine| magazine.id).collect::<Vec<_>>();

		ids.sort_unstable();

		assert_eq!(ids, [1, 2, 3]);

		let mut paths = transport.paths(HttpMethod::Get);

		paths.sort();

		assert_eq!(
			paths,
			["/api/magazines/t/Empty", "/api/magazines/t/Home%20Decor", "/api/magazines/t/News"]
		);
	}

	#[tokio::test]
	async fn category_calls_are_all_in_flight_together() {
		let categories = ["A", "BB", "CCC"].into_iter().collect::<CategorySet>();
		let client = StoreClient::with_http_client(
			mock_descriptor(),
			GatedStore { gate: Barrier::new(categories.len()) },
		);
		let magazines = tokio::time::timeout(
			Duration::from_secs(5),
			client.fetch_magazines(&token(), &categories),
		)
		.await
		.expect("Every category call must be issued before any reply is awaited.")
		.expect("Magazines should be fetched.");
		let mut ids = magazines.iter().map(|magazine| magazine.id).collect::<Vec<_>>();

		ids.sort_unstable();

		assert_eq!(ids, [1, 2, 3]);
	}

	#[tokio::test]
	async fn one_failing_category_fails_the_whole_fetch() {
		let transport = MockTransport::default()
			.get(
				"/api/magazines/t/News",
				ok_envelope("t", r#"[{"id":1,"name":"Daily","category":"News"}]"#),
			)
			.reply(
				HttpMethod::Get,
				"/api/magazines/t/Sports",
				MockReply::Fail(|| TransportError::Timeout),
			);
		let categories = ["News", "Sports"].into_iter().collect::<CategorySet>();
		let err = mock_client(transport)
			.fetch_magazines(&token(), &categories)
			.await
			.expect_err("A failed category must fail the fan-out.");

		assert!(matches!(
			err,
			Error::Transport { endpoint: Endpoint::Magazines, source: TransportError::Timeout }
		));
	}

	#[tokio::test]
	async fn no_categories_means_no_calls() {
		let transport = Arc::new(MockTransport::default());
		let magazines = mock_client(transport.clone())
			.fetch_magazines(&token(), &CategorySet::default())
			.await
			.expect("Empty fan-out should succeed.");

		assert!(magazines.is_empty());
		assert!(transport.calls().is_empty());
	}
}
