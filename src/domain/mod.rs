//! Domain layer for the shopping-list client.
//!
//! Core types shared by the access layer, the suggestion engine and the
//! front end, with no knowledge of HTTP or terminals.
//!
//! # Organization
//!
//! - [`error`]: Error taxonomy and result alias
//! - [`session`]: Session and auth wire bodies
//! - [`list`]: Lists and lists with items
//! - [`item`]: Items, measures and item request bodies
//! - [`article`]: Search-index articles
//! - [`validation`]: Form input checks
//!
//! # Examples
//!
//! ```
//! use shoplist::domain::{CreateItemRequest, Measure, Result};
//!
//! fn bread() -> Result<CreateItemRequest> {
//!     Ok(CreateItemRequest::new("Pain").with_measure(Measure::Quantity(2)))
//! }
//! ```

pub mod article;
pub mod error;
pub mod item;
pub mod list;
pub mod session;
pub mod validation;

pub use article::{Article, ArticleSearchResponse, SearchKind};
pub use error::{Result, ShoplistError};
pub use item::{CreateItemRequest, Item, Measure, UpdateItemRequest, Weight, WeightUnit};
pub use list::{CreateListRequest, List, ListWithItems};
pub use session::{AuthMeResponse, RefreshResponse, Session, UserProfile};
