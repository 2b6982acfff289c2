/// Maximum size of a single uploaded document (10MB)
pub const MAX_FILE_SIZE_BYTES: usize = 10 * 1024 * 1024;

/// Content types accepted for uploaded documents
///
/// Matched against the declared multipart content type only; file bytes
/// are not sniffed.
pub const ALLOWED_CONTENT_TYPES: [&str; 5] = [
    "application/pdf",
    "image/jpeg",
    "image/png",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// Maximum size of the whole multipart request body
///
/// Four documents at 10MB each plus the text fields, with headroom for
/// multipart framing.
pub const MAX_REQUEST_BODY_BYTES: usize = 48 * 1024 * 1024;

/// Length of the fixed rate-limit window in minutes
pub const RATE_LIMIT_WINDOW_MINUTES: i64 = 60;

/// Maximum admitted submissions per IP per window
pub const MAX_SUBMISSIONS_PER_WINDOW: i64 = 3;

/// Lifetime of a signed document URL in seconds (1 hour)
pub const SIGNED_URL_TTL_SECS: i64 = 3600;

/// Length of the random token in stored document names
pub const STORAGE_TOKEN_LEN: usize = 8;

// =============================================================================
// Text Field Length Caps
// =============================================================================
// yearOfStudy and cgpa intentionally carry no cap.

pub const MAX_FULL_NAME_LEN: usize = 200;
pub const MAX_EMAIL_LEN: usize = 255;
pub const MAX_PHONE_LEN: usize = 20;
pub const MAX_COMMUNITY_NAME_LEN: usize = 100;
pub const MAX_UNIVERSITY_LEN: usize = 200;
pub const MAX_COURSE_LEN: usize = 200;
pub const MAX_REASON_LEN: usize = 5000;

// =============================================================================
// Error Messages
// =============================================================================

/// Error message for a client that exhausted its submission window
pub const ERR_TOO_MANY_SUBMISSIONS: &str =
    "Too many submissions. Please wait before trying again.";

/// Error message for a malformed email address
pub const ERR_INVALID_EMAIL: &str = "Invalid email format";

/// Error messages for missing required documents
pub const ERR_TRANSCRIPT_REQUIRED: &str = "Academic transcript is required";
pub const ERR_APPLICATION_LETTER_REQUIRED: &str = "Application letter is required";
pub const ERR_NOMINATION_LETTER_REQUIRED: &str = "Nomination letter is required";
