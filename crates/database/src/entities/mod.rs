pub mod booking;
pub mod login;
pub mod reservation;
pub mod room;
pub mod semester;

pub use booking as bookings;
pub use login as logins;
pub use reservation as reservations;
pub use room as rooms;
pub use semester as semesters;
