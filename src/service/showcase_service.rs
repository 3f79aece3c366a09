//! Showcase service: gallery, customer reviews, and the owner profile.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::showcase::{filter_gallery, gallery_categories};
use crate::domain::{
    EventBus, GalleryImage, GalleryImageInput, NewReview, OwnerProfile, OwnerProfileInput,
    Review, ReviewStatus, SiteEvent,
};
use crate::error::SiteError;
use crate::persistence::{ReviewFilter, SiteStore};

/// Orchestrates the content that shows off past work.
#[derive(Debug, Clone)]
pub struct ShowcaseService {
    store: Arc<dyn SiteStore>,
    event_bus: EventBus,
}

impl ShowcaseService {
    /// Creates a new `ShowcaseService`.
    #[must_use]
    pub fn new(store: Arc<dyn SiteStore>, event_bus: EventBus) -> Self {
        Self { store, event_bus }
    }

    // ── gallery ─────────────────────────────────────────────────────────

    /// Published images of `category` (`None` / `"all"` for every one).
    ///
    /// # Errors
    ///
    /// Returns a storage error on database failure.
    pub async fn public_gallery(
        &self,
        category: Option<&str>,
    ) -> Result<Vec<GalleryImage>, SiteError> {
        let images = self.store.list_gallery_images().await?;
        Ok(filter_gallery(&images, category))
    }

    /// Distinct categories among published images.
    ///
    /// # Errors
    ///
    /// Returns a storage error on database failure.
    pub async fn gallery_categories(&self) -> Result<Vec<String>, SiteError> {
        let images = self.store.list_gallery_images().await?;
        Ok(gallery_categories(&images))
    }

    /// Every image, published or not, for the admin console.
    ///
    /// # Errors
    ///
    /// Returns a storage error on database failure.
    pub async fn list_gallery_images(&self) -> Result<Vec<GalleryImage>, SiteError> {
        self.store.list_gallery_images().await
    }

    /// Adds an image.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Validation`] for incomplete input.
    pub async fn create_gallery_image(
        &self,
        input: GalleryImageInput,
    ) -> Result<GalleryImage, SiteError> {
        let input = input.validate()?;
        let image = GalleryImage {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            category: input.category,
            image_url: input.image_url,
            alt_text: input.alt_text,
            display_order: input.display_order,
            is_published: input.is_published,
            created_at: Utc::now(),
        };
        self.store.insert_gallery_image(&image).await?;
        tracing::info!(image_id = %image.id, category = %image.category, "gallery image added");
        Ok(image)
    }

    /// Replaces an image's editable fields.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Validation`] for incomplete input and
    /// [`SiteError::NotFound`] for an unknown id.
    pub async fn update_gallery_image(
        &self,
        id: Uuid,
        input: GalleryImageInput,
    ) -> Result<GalleryImage, SiteError> {
        let input = input.validate()?;
        let existing = self.gallery_image(id).await?;
        let image = GalleryImage {
            title: input.title,
            description: input.description,
            category: input.category,
            image_url: input.image_url,
            alt_text: input.alt_text,
            display_order: input.display_order,
            is_published: input.is_published,
            ..existing
        };
        self.store.update_gallery_image(&image).await?;
        tracing::info!(image_id = %id, "gallery image updated");
        Ok(image)
    }

    /// Shows or hides an image on the public site.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::NotFound`] for an unknown id.
    pub async fn set_gallery_image_published(
        &self,
        id: Uuid,
        is_published: bool,
    ) -> Result<GalleryImage, SiteError> {
        let image = GalleryImage {
            is_published,
            ..self.gallery_image(id).await?
        };
        self.store.update_gallery_image(&image).await?;
        tracing::info!(image_id = %id, is_published, "gallery image visibility changed");
        Ok(image)
    }

    /// Deletes an image.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::NotFound`] for an unknown id.
    pub async fn delete_gallery_image(&self, id: Uuid) -> Result<(), SiteError> {
        self.store.delete_gallery_image(id).await?;
        tracing::info!(image_id = %id, "gallery image deleted");
        Ok(())
    }

    async fn gallery_image(&self, id: Uuid) -> Result<GalleryImage, SiteError> {
        self.store
            .get_gallery_image(id)
            .await?
            .ok_or_else(|| SiteError::not_found("gallery image", id))
    }

    // ── reviews ─────────────────────────────────────────────────────────

    /// Stores a customer review for moderation.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Validation`] for bad input.
    pub async fn submit_review(&self, input: NewReview) -> Result<Review, SiteError> {
        let input = input.validate()?;
        let review = Review {
            id: Uuid::new_v4(),
            customer_name: input.customer_name,
            location: input.location,
            rating: input.rating,
            content: input.content,
            service_type: input.service_type,
            status: ReviewStatus::Pending,
            submitted_at: Utc::now(),
            published_at: None,
        };
        self.store.insert_review(&review).await?;
        tracing::info!(review_id = %review.id, rating = review.rating, "review submitted");

        let _ = self.event_bus.publish(SiteEvent::ReviewSubmitted {
            review_id: review.id,
            rating: review.rating,
            timestamp: review.submitted_at,
        });
        Ok(review)
    }

    /// Approved reviews for the public site, most recently published first.
    ///
    /// # Errors
    ///
    /// Returns a storage error on database failure.
    pub async fn approved_reviews(&self) -> Result<Vec<Review>, SiteError> {
        let filter = ReviewFilter {
            status: Some(ReviewStatus::Approved),
            ..ReviewFilter::default()
        };
        let mut reviews = self.store.list_reviews(&filter).await?;
        reviews.sort_by_key(|r| std::cmp::Reverse(r.published_at.unwrap_or(r.submitted_at)));
        Ok(reviews)
    }

    /// Lists reviews matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns a storage error on database failure.
    pub async fn list_reviews(&self, filter: &ReviewFilter) -> Result<Vec<Review>, SiteError> {
        self.store.list_reviews(filter).await
    }

    /// Publishes a review.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::NotFound`] for an unknown id.
    pub async fn approve_review(&self, id: Uuid) -> Result<Review, SiteError> {
        self.moderate(id, ReviewStatus::Approved).await
    }

    /// Hides a review for good.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::NotFound`] for an unknown id.
    pub async fn reject_review(&self, id: Uuid) -> Result<Review, SiteError> {
        self.moderate(id, ReviewStatus::Rejected).await
    }

    async fn moderate(&self, id: Uuid, status: ReviewStatus) -> Result<Review, SiteError> {
        let now = Utc::now();
        let published_at = (status == ReviewStatus::Approved).then_some(now);
        let review = self.store.set_review_status(id, status, published_at).await?;
        tracing::info!(review_id = %id, status = %status, "review moderated");

        let _ = self.event_bus.publish(SiteEvent::ReviewModerated {
            review_id: id,
            status,
            timestamp: now,
        });
        Ok(review)
    }

    /// Deletes a review.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::NotFound`] for an unknown id.
    pub async fn delete_review(&self, id: Uuid) -> Result<(), SiteError> {
        self.store.delete_review(id).await?;
        tracing::info!(review_id = %id, "review deleted");
        Ok(())
    }

    // ── owner profile ───────────────────────────────────────────────────

    /// The owner profile.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::NotFound`] until a profile has been saved.
    pub async fn owner_profile(&self) -> Result<OwnerProfile, SiteError> {
        self.store
            .get_owner_profile()
            .await?
            .ok_or_else(|| SiteError::not_found("owner profile", "singleton"))
    }

    /// Creates or replaces the owner profile, keeping its id stable.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Validation`] for bad input.
    pub async fn update_owner_profile(
        &self,
        input: OwnerProfileInput,
    ) -> Result<OwnerProfile, SiteError> {
        let input = input.validate()?;
        let id = self
            .store
            .get_owner_profile()
            .await?
            .map_or_else(Uuid::new_v4, |p| p.id);
        let profile = OwnerProfile {
            id,
            name: input.name,
            title: input.title,
            bio: input.bio,
            photo_url: input.photo_url,
            years_experience: input.years_experience,
            certifications: input.certifications,
            updated_at: Utc::now(),
        };
        self.store.save_owner_profile(&profile).await?;
        tracing::info!("owner profile updated");
        Ok(profile)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    fn service() -> ShowcaseService {
        ShowcaseService::new(Arc::new(MemoryStore::new()), EventBus::new(16))
    }

    fn image(title: &str, category: &str, published: bool) -> GalleryImageInput {
        GalleryImageInput {
            title: title.to_string(),
            description: None,
            category: category.to_string(),
            image_url: format!("https://cdn.example/{title}.jpg"),
            alt_text: None,
            display_order: 0,
            is_published: published,
        }
    }

    fn review(rating: i32) -> NewReview {
        NewReview {
            customer_name: "Mikko".to_string(),
            location: Some("Tampere".to_string()),
            rating,
            content: "Beautiful cedar work.".to_string(),
            service_type: None,
        }
    }

    #[tokio::test]
    async fn gallery_filter_by_category() {
        let svc = service();
        for (title, category, published) in [
            ("a", "Indoor", true),
            ("b", "outdoor", true),
            ("c", "outdoor", false),
        ] {
            assert!(svc.create_gallery_image(image(title, category, published)).await.is_ok());
        }

        let outdoor = svc.public_gallery(Some("outdoor")).await.unwrap_or_default();
        assert_eq!(outdoor.len(), 1);
        assert!(outdoor.iter().all(|i| i.category == "outdoor" && i.is_published));

        let all = svc.public_gallery(Some("ALL")).await.unwrap_or_default();
        assert_eq!(all.len(), 2);

        let categories = svc.gallery_categories().await.unwrap_or_default();
        assert_eq!(categories, vec!["indoor", "outdoor"]);
    }

    #[tokio::test]
    async fn hiding_an_image_removes_it_from_public_gallery() {
        let svc = service();
        let Ok(created) = svc.create_gallery_image(image("a", "indoor", true)).await else {
            panic!("create failed");
        };
        assert!(svc.set_gallery_image_published(created.id, false).await.is_ok());
        assert!(svc.public_gallery(None).await.unwrap_or_default().is_empty());
        assert_eq!(svc.list_gallery_images().await.map(|v| v.len()).ok(), Some(1));
    }

    #[tokio::test]
    async fn approval_and_rejection_set_timestamps() {
        let svc = service();
        let Ok(first) = svc.submit_review(review(5)).await else {
            panic!("submit failed");
        };
        assert_eq!(first.status, ReviewStatus::Pending);
        assert_eq!(first.published_at, None);

        let Ok(approved) = svc.approve_review(first.id).await else {
            panic!("approve failed");
        };
        assert_eq!(approved.status, ReviewStatus::Approved);
        assert!(approved.published_at.is_some());

        let Ok(second) = svc.submit_review(review(2)).await else {
            panic!("submit failed");
        };
        let Ok(rejected) = svc.reject_review(second.id).await else {
            panic!("reject failed");
        };
        assert_eq!(rejected.status, ReviewStatus::Rejected);
        assert_eq!(rejected.published_at, None);

        let public = svc.approved_reviews().await.unwrap_or_default();
        assert_eq!(public.len(), 1);
    }

    #[tokio::test]
    async fn rejecting_an_approved_review_clears_published_at() {
        let svc = service();
        let Ok(r) = svc.submit_review(review(4)).await else {
            panic!("submit failed");
        };
        assert!(svc.approve_review(r.id).await.is_ok());
        let Ok(rejected) = svc.reject_review(r.id).await else {
            panic!("reject failed");
        };
        assert_eq!(rejected.published_at, None);
    }

    #[tokio::test]
    async fn moderating_unknown_review_is_not_found() {
        let svc = service();
        assert!(matches!(
            svc.approve_review(Uuid::new_v4()).await,
            Err(SiteError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn owner_profile_keeps_its_id() {
        let svc = service();
        assert!(matches!(
            svc.owner_profile().await,
            Err(SiteError::NotFound { .. })
        ));
        let input = |bio: &str| OwnerProfileInput {
            name: "Pekka".to_string(),
            title: Some("Master Builder".to_string()),
            bio: bio.to_string(),
            photo_url: None,
            years_experience: Some(20),
            certifications: vec!["  ".to_string(), "Sauna from Finland".to_string()],
        };
        let Ok(first) = svc.update_owner_profile(input("First")).await else {
            panic!("save failed");
        };
        let Ok(second) = svc.update_owner_profile(input("Second")).await else {
            panic!("save failed");
        };
        assert_eq!(first.id, second.id);
        assert_eq!(second.certifications, vec!["Sauna from Finland"]);
        assert_eq!(svc.owner_profile().await.map(|p| p.bio).ok().as_deref(), Some("Second"));
    }
}
