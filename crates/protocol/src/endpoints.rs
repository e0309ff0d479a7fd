//! Relative paths of the backend HTTP surface.

// Authentication
pub const LOGIN: &str = "/auth/login";
pub const SIGNUP: &str = "/auth/signup";
pub const LOGOUT: &str = "/auth/logout";
pub const REFRESH_TOKEN: &str = "/auth/refresh";
pub const FORGOT_PASSWORD: &str = "/auth/forgot-password";
pub const RESET_PASSWORD: &str = "/auth/reset-password";
pub const VERIFY_EMAIL: &str = "/auth/verify-email";

// Users
pub const USERS: &str = "/users";
pub const USER_PROFILE: &str = "/users/profile";
pub const USER_SEARCH: &str = "/users/search";

// Swap requests
pub const SWAP_REQUESTS: &str = "/swap-requests";

// Reviews
pub const REVIEWS: &str = "/reviews";
pub const REVIEW_STATS: &str = "/reviews/stats";

// Notifications
pub const NOTIFICATIONS: &str = "/notifications";
pub const NOTIFICATIONS_READ_ALL: &str = "/notifications/read-all";

// Uploads
pub const UPLOAD_PROFILE_PHOTO: &str = "/upload/profile-photo";
pub const UPLOAD_DOCUMENT: &str = "/upload/document";
