use common::Item;
use tracing::warn;

use crate::draft::{ImageFile, ItemDraft};
use crate::error::ClientResult;
use crate::http::ItemsClient;

/// Client-side item list with loading and error state.
///
/// Mutations go through the server first and are applied locally only on
/// success, so `items()` always reflects what the server last confirmed.
#[derive(Debug)]
pub struct ItemsState {
    client: ItemsClient,
    items: Vec<Item>,
    loading: bool,
    error: Option<String>,
}

impl ItemsState {
    pub fn new(client: ItemsClient) -> Self {
        Self {
            client,
            items: Vec::new(),
            loading: false,
            error: None,
        }
    }

    pub fn client(&self) -> &ItemsClient {
        &self.client
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Message of the last failed operation, cleared by the next success.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn find(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Items at or below their low-stock threshold, from the local list.
    pub fn low_stock(&self) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(|i| i.is_low_stock())
    }

    fn settle<T>(&mut self, result: ClientResult<T>) -> ClientResult<T> {
        self.loading = false;
        match &result {
            Ok(_) => self.error = None,
            Err(e) => {
                warn!(error = %e, "Items request failed");
                self.error = Some(e.to_string());
            }
        }
        result
    }

    fn replace(&mut self, item: Item) {
        match self.items.iter_mut().find(|i| i.id == item.id) {
            Some(slot) => *slot = item,
            None => self.items.push(item),
        }
    }

    /// Reload the full list from the server.
    pub async fn load(&mut self) -> ClientResult<()> {
        self.loading = true;
        let result = self.client.list().await;
        let items = self.settle(result)?;
        self.items = items;
        Ok(())
    }

    pub async fn add(&mut self, draft: &ItemDraft, image: Option<ImageFile>) -> ClientResult<Item> {
        self.loading = true;
        let result = match image {
            Some(image) => self.client.create_with_image(draft, image).await,
            None => self.client.create(draft).await,
        };
        let item = self.settle(result)?;
        self.items.push(item.clone());
        Ok(item)
    }

    pub async fn update(
        &mut self,
        id: &str,
        draft: &ItemDraft,
        image: Option<ImageFile>,
    ) -> ClientResult<Item> {
        self.loading = true;
        let result = match image {
            Some(image) => self.client.update_with_image(id, draft, image).await,
            None => self.client.update(id, draft).await,
        };
        let item = self.settle(result)?;
        self.replace(item.clone());
        Ok(item)
    }

    pub async fn set_quantity(&mut self, id: &str, quantity: i64) -> ClientResult<Item> {
        self.loading = true;
        let result = self.client.update_quantity(id, quantity).await;
        let item = self.settle(result)?;
        self.replace(item.clone());
        Ok(item)
    }

    pub async fn remove(&mut self, id: &str) -> ClientResult<Item> {
        self.loading = true;
        let result = self.client.delete(id).await;
        let item = self.settle(result)?;
        self.items.retain(|i| i.id != item.id);
        Ok(item)
    }
}
