//! Subscriber retrieval.

// self
use crate::{
	_prelude::*,
	api::{Endpoint, SubscribersResponse},
	client::StoreClient,
	http::{HttpRequest, StoreHttpClient},
	model::{SessionToken, Subscriber},
	obs::{self, Stage},
};

impl<C> StoreClient<C>
where
	C: ?Sized + StoreHttpClient,
{
	/// Retrieves every subscriber record with its owned magazine ids.
	pub async fn fetch_subscribers(&self, token: &SessionToken) -> Result<Vec<Subscriber>> {
		obs::observe(Stage::Subscribers, self.request_subscribers(token)).await
	}

	async fn request_subscribers(&self, token: &SessionToken) -> Result<Vec<Subscriber>> {
		let url = self.endpoint_url(Endpoint::Subscribers, &[token.expose()])?;
		let subscribers = self.call::<SubscribersResponse>(HttpRequest::get(url)).await?;

		obs::record_count(Stage::Subscribers, subscribers.len());

		Ok(subscribers)
	}
}

#[cfg(test)]
mod tests {
	// self
	use crate::{_preludet::*, model::SessionToken};

	#[tokio::test]
	async fn subscribers_decode_with_owned_magazines() {
		let transport = MockTransport::default().get(
			"/api/subscribers/t",
			ok_envelope(
				"t",
				r#"[
					{"id":"00000000-0000-0000-0000-000000000001","firstName":"A","lastName":"B","magazineIds":[1,2]},
					{"id":"00000000-0000-0000-0000-000000000002","firstName":"C","lastName":"D","magazineIds":[]}
				]"#,
			),
		);
		let token = SessionToken::new("t").expect("Token fixture should be valid.");
		let subscribers = mock_client(transport)
			.fetch_subscribers(&token)
			.await
			.expect("Subscribers should be fetched.");

		assert_eq!(subscribers.len(), 2);
		assert_eq!(subscribers[0].id, Uuid::from_u128(1));
		assert_eq!(subscribers[0].magazine_ids, HashSet::from([1, 2]));
		assert!(subscribers[1].magazine_ids.is_empty());
	}
}
