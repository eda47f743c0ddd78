pub mod cli_consts {
    //! Console Configuration Constants
    //!
    //! Defaults shared by the view-model, the API client and the dashboard,
    //! organized by functional area.

    // =============================================================================
    // QUEUE CONFIGURATION
    // =============================================================================

    /// The maximum number of events to keep in the activity logs.
    pub const MAX_ACTIVITY_LOGS: usize = 100;

    /// Buffer size of the channel carrying poller events to the view-model
    pub const EVENT_QUEUE_SIZE: usize = 100;

    // =============================================================================
    // CAMPAIGN DEFAULTS
    // =============================================================================

    /// Deck attached to e-mail campaigns when the attach flag is set.
    /// The path is resolved on the backend host, not locally.
    pub const DEFAULT_ATTACHMENT_PATH: &str = "/app/data/TransferX_College_Deck.pdf";

    /// Sample recipient used when rendering LinkedIn templates locally
    pub mod linkedin_preview {
        pub const SAMPLE_NAME: &str = "John";
        pub const SAMPLE_COLLEGE: &str = "UCLA";
    }

    // =============================================================================
    // NETWORK CONFIGURATION
    // =============================================================================

    /// Campaign progress polling
    pub mod polling {
        use std::time::Duration;

        /// Seconds between two progress fetches for the same campaign
        pub const INTERVAL_SECS: u64 = 5;

        pub const fn interval() -> Duration {
            Duration::from_secs(INTERVAL_SECS)
        }
    }

    /// HTTP client timeouts
    pub mod http {
        use std::time::Duration;

        pub const CONNECT_TIMEOUT_SECS: u64 = 10;

        /// Discovery runs scrape college sites on the backend and can take a while
        pub const REQUEST_TIMEOUT_SECS: u64 = 120;

        pub const fn connect_timeout() -> Duration {
            Duration::from_secs(CONNECT_TIMEOUT_SECS)
        }

        pub const fn request_timeout() -> Duration {
            Duration::from_secs(REQUEST_TIMEOUT_SECS)
        }
    }
}
