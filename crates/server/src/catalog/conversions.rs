//! Remote product to local view conversions.

use super::types::{ProductView, RemoteProduct};

/// Project a remote product for a list response (no category).
#[must_use]
pub fn list_view(product: RemoteProduct) -> ProductView {
    let image = first_image(product.images);
    ProductView {
        id: product.id,
        name: product.title,
        price: product.price,
        description: product.description,
        image,
        category_id: None,
    }
}

/// Project a remote product for a detail response, including the
/// category id when the remote sent one.
#[must_use]
pub fn detail_view(product: RemoteProduct) -> ProductView {
    let image = first_image(product.images);
    ProductView {
        id: product.id,
        name: product.title,
        price: product.price,
        description: product.description,
        image,
        category_id: product.category.map(|c| c.id),
    }
}

fn first_image(images: Vec<String>) -> String {
    images.into_iter().next().unwrap_or_default()
}
