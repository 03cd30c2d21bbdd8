pub mod card;
pub mod effective;
pub mod weather;
