use crate::{
    error::AppError,
    models::{CardImage, CardItem, DocumentResponse, QaPair},
    registry::ContentRegistry,
    storage::{ContentStore, StorageError},
    table::sort_by_difficulty,
    titles::breadcrumbs,
};

/// load_document
///
/// Resolves a catch-all document path. Only the last segment selects the
/// document; breadcrumbs are built from the path as requested, while
/// `canonical_path` reflects the document's real position in the tree.
pub async fn load_document(
    registry: &ContentRegistry,
    store: &dyn ContentStore,
    path: &str,
) -> Result<DocumentResponse, AppError> {
    let id = path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .next_back()
        .ok_or_else(|| AppError::not_found("empty document path"))?;

    let doc = registry.find_document(id).ok_or_else(|| {
        tracing::info!("No document found for ID: {}", id);
        AppError::not_found(format!("document {}", id))
    })?;

    let body = store.read(&doc.source).await.map_err(|e| {
        if let StorageError::NotFound(_) = e {
            tracing::warn!(id = %doc.id, source = %doc.source, "registered document has no body");
        }
        AppError::from(e)
    })?;

    let canonical_path = registry
        .document_path(&doc.id)
        .unwrap_or_else(|| format!("/documents/{}", doc.id));

    let sub_documents = resolve_card_images(store, registry.sub_document_cards(&doc.id)).await;

    Ok(DocumentResponse {
        id: doc.id.clone(),
        title: doc.title.clone(),
        body,
        canonical_path,
        breadcrumbs: breadcrumbs(&format!("/documents/{}", path.trim_matches('/'))),
        sub_documents,
    })
}

/// load_questions
///
/// Reads and parses a question set, sorted by ascending difficulty.
pub async fn load_questions(
    registry: &ContentRegistry,
    store: &dyn ContentStore,
    id: &str,
) -> Result<Vec<QaPair>, AppError> {
    let set = registry.find_question_set(id).ok_or_else(|| {
        tracing::info!("No configuration found for ID: {}", id);
        AppError::not_found(format!("question set {}", id))
    })?;

    let raw = store.read(&set.source).await?;
    let mut questions: Vec<QaPair> = serde_json::from_str(&raw)
        .map_err(|e| AppError::Internal(format!("malformed question set {}: {}", set.source, e)))?;

    sort_by_difficulty(&mut questions);
    Ok(questions)
}

/// resolve_card_images
///
/// Swaps each card image's storage key for a fetchable URL. A card whose URL
/// cannot be resolved is kept without its image.
pub async fn resolve_card_images(store: &dyn ContentStore, cards: Vec<CardItem>) -> Vec<CardItem> {
    let mut resolved = Vec::with_capacity(cards.len());
    for mut card in cards {
        if let Some(image) = card.image.take() {
            match store.asset_url(&image.src).await {
                Ok(url) => {
                    card.image = Some(CardImage {
                        src: url,
                        alt: image.alt,
                    })
                }
                Err(e) => tracing::error!("asset url error for {}: {}", image.src, e),
            }
        }
        resolved.push(card);
    }
    resolved
}
