//! Domain layer: typed records, static site catalog, and event system.
//!
//! Records mirror the database tables one-to-one. Input types validate
//! themselves before they reach a store. The catalog holds the content
//! compiled into the binary, and the event bus fans operator-visible
//! changes out to the admin live feed.

pub mod blog;
pub mod catalog;
pub mod event_bus;
pub mod lead;
pub mod role;
pub mod showcase;
pub mod site_event;

pub use blog::{
    BlogPost, BlogPostUpdate, ContentRelationship, GenerationLog, GenerationStatus,
    GeneratorSettings, GeneratorSettingsInput, PostStatus, SiteContent, WritingContext,
    WritingContextInput,
};
pub use catalog::{Catalog, PageDef, PageKind, catalog};
pub use event_bus::EventBus;
pub use lead::{Contact, ContactStatus, NewContact, NewSubscriber, Subscriber};
pub use role::AppRole;
pub use showcase::{
    GalleryImage, GalleryImageInput, NewReview, OwnerProfile, OwnerProfileInput, Review,
    ReviewStatus,
};
pub use site_event::{SiteEvent, Topic};
