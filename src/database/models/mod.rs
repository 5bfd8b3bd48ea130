pub mod item;
pub mod organization;

pub use item::{Item, ItemCreate, ItemUpdate, NewItem};
pub use organization::{NewOrganization, Organization, OrganizationCreate, OrganizationUpdate};
