//! OpenAPI document aggregating every annotated handler.

use utoipa::OpenApi;

use crate::api::dto::{
    ContactStatusUpdate, PageView, PublishedUpdate, ScheduledRunResponse, SubmitUrlRequest,
    UnsubscribeRequest,
};
use crate::api::handlers::{analytics, blog, catalog, leads, showcase, site_content, system};
use crate::domain::catalog::{FaqEntry, HealthBenefit, SearchEntry, ServiceOffering};
use crate::domain::{
    BlogPost, BlogPostUpdate, Contact, ContactStatus, ContentRelationship, GalleryImage,
    GalleryImageInput, GenerationLog, GenerationStatus, GeneratorSettings,
    GeneratorSettingsInput, NewContact, NewReview, NewSubscriber, OwnerProfile,
    OwnerProfileInput, PageDef, PageKind, PostStatus, Review, ReviewStatus, SiteContent,
    Subscriber, WritingContext, WritingContextInput,
};
use crate::error::{ErrorBody, ErrorResponse};
use crate::integrations::SubmissionReceipt;
use crate::service::analytics_service::{DailyBucket, DashboardTotals, ServiceCount};
use crate::service::{Dashboard, GenerateRequest, IndexReport, LinkSuggestion};

/// The site's OpenAPI 3 document.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "sauna-site",
        description = "Marketing site and admin console API for a sauna installation business."
    ),
    paths(
        system::health_handler,
        catalog::list_pages,
        catalog::list_services,
        catalog::list_health_benefits,
        catalog::list_faq,
        catalog::search,
        leads::submit_contact,
        leads::subscribe,
        leads::unsubscribe,
        leads::list_contacts,
        leads::export_contacts,
        leads::update_contact_status,
        leads::delete_contact,
        leads::list_subscribers,
        leads::export_subscribers,
        leads::delete_subscriber,
        showcase::public_gallery,
        showcase::gallery_categories,
        showcase::approved_reviews,
        showcase::submit_review,
        showcase::owner_profile,
        showcase::list_gallery_images,
        showcase::create_gallery_image,
        showcase::update_gallery_image,
        showcase::set_gallery_image_published,
        showcase::delete_gallery_image,
        showcase::list_reviews,
        showcase::export_reviews,
        showcase::approve_review,
        showcase::reject_review,
        showcase::delete_review,
        showcase::update_owner_profile,
        blog::published_posts,
        blog::post_by_slug,
        blog::list_posts,
        blog::update_post,
        blog::delete_post,
        blog::post_relationships,
        blog::get_settings,
        blog::put_settings,
        blog::get_writing_context,
        blog::put_writing_context,
        blog::generate_post,
        blog::run_scheduled,
        blog::generation_logs,
        site_content::list_site_content,
        site_content::reindex,
        site_content::link_suggestions,
        site_content::submit_url,
        analytics::dashboard,
    ),
    components(schemas(
        ErrorResponse, ErrorBody, PageView, PageDef, PageKind, ServiceOffering, HealthBenefit,
        FaqEntry, SearchEntry, Contact, ContactStatus, NewContact, ContactStatusUpdate,
        Subscriber, NewSubscriber, UnsubscribeRequest, GalleryImage, GalleryImageInput,
        PublishedUpdate, Review, ReviewStatus, NewReview, OwnerProfile, OwnerProfileInput,
        BlogPost, BlogPostUpdate, PostStatus, GeneratorSettings, GeneratorSettingsInput,
        WritingContext, WritingContextInput, GenerationLog, GenerationStatus,
        ContentRelationship, GenerateRequest, ScheduledRunResponse, SiteContent, IndexReport,
        LinkSuggestion, SubmitUrlRequest, SubmissionReceipt, Dashboard, DashboardTotals,
        DailyBucket, ServiceCount,
    )),
    tags(
        (name = "System", description = "Health"),
        (name = "Catalog", description = "Static pages, services, articles and search"),
        (name = "Leads", description = "Contact form and newsletter"),
        (name = "Showcase", description = "Gallery, reviews and owner profile"),
        (name = "Blog", description = "Published blog posts"),
        (name = "Admin", description = "Session-gated console endpoints"),
    )
)]
pub struct ApiDoc;
