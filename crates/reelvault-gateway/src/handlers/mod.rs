mod entries;
mod health;
mod votes;

pub use entries::{
    create_entry_handler, delete_entry_handler, list_community_entries_handler,
    list_my_entries_handler, release_entry_handler, search_entries_handler, update_entry_handler,
};
pub use health::health_handler;
pub use votes::{dislike_entry_handler, interaction_handler, like_entry_handler};
