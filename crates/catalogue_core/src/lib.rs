pub mod domain;
pub mod form;
pub mod graphql;
pub mod loader;
pub mod navigation;
pub mod normalize;
pub mod ports;
pub mod session;

pub use domain::{Credentials, FieldMap, Genre, GenreMovies, Movie, MpaaRating};
pub use form::{FormAction, FormController, FormState, Notice, NoticeKind, Prompt, SubmitOutcome};
pub use graphql::GraphqlQuery;
pub use loader::{DataLoader, LoadOutcome, ViewState};
pub use navigation::Route;
pub use ports::{CatalogueApi, PortError, PortResult, Reply, TokenStorage};
pub use session::{MemoryTokenStorage, SessionStore};
