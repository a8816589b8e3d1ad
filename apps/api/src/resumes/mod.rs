// Resume CRUD. Every operation is scoped to the calling user.

pub mod handlers;
