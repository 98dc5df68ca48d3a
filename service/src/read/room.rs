//! [`Room`]-related read definitions.

pub mod list {
    //! [`Room`] list definitions.

    use common::define_pagination;
    use derive_more::{From, Into};

    use crate::domain::{room, room_type};
    #[cfg(doc)]
    use crate::domain::Room;

    define_pagination!(Cursor, Node, Filter);

    /// Node in a [`Connection`].
    pub type Node = room::Id;

    /// Cursor pointing to a specific [`Room`] in a list.
    pub type Cursor = room::Id;

    /// Filter for [`Selector`].
    #[derive(Clone, Debug, Default)]
    pub struct Filter {
        /// [`room_type::Id`] to narrow the list to.
        pub kind_id: Option<room_type::Id>,

        /// [`room::Status`] to narrow the list to.
        pub status: Option<room::Status>,
    }

    /// Total count of [`Room`] list items.
    #[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
    pub struct TotalCount(i32);
}
