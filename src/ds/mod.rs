pub mod intrusive_list;
pub mod key_order;
pub mod slot_arena;

pub use intrusive_list::IntrusiveList;
pub use key_order::KeyOrder;
pub use slot_arena::{SlotArena, SlotId};
