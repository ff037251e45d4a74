use clap::Parser;
use redstream::client::{Sort, TimeWindow};

#[derive(Parser, Debug)]
#[command(
    name = "redstream",
    version,
    about = "Reddit API client with deduplicated polling streams."
)]
pub struct Cli {
    /// IANA time zone used to display timestamps.
    #[arg(long, global = true, default_value = "America/Los_Angeles")]
    pub tz: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Fetch posts from a subreddit or redditor.
    Posts {
        /// Subreddit (`rust`, `r/rust`, `rust+golang`) or redditor (`u/name`).
        target: String,

        /// The number of posts to retrieve.
        #[arg(long, short, default_value_t = 10)]
        count: u32,

        #[arg(long, short, default_value = "new")]
        sort: Sort,

        /// Time window for top and controversial.
        #[arg(long, short = 't', default_value = "all")]
        time: TimeWindow,

        /// Display posts in a brief, one-line format.
        #[arg(long, short)]
        brief: bool,
    },

    /// Fetch comments from a subreddit, a redditor or a post (`t3_...`).
    Comments {
        target: String,

        #[arg(long, short, default_value_t = 25)]
        count: u32,

        #[arg(long, short, default_value = "new")]
        sort: Sort,

        #[arg(long, short = 't', default_value = "all")]
        time: TimeWindow,
    },

    /// Follow new posts (or comments) as they are published.
    Stream {
        /// Subreddit or redditor to follow.
        target: String,

        /// Follow comments instead of posts.
        #[arg(long)]
        comments: bool,

        /// Stop after this many items.
        #[arg(long, short)]
        limit: Option<usize>,

        /// Seconds between polls.
        #[arg(long, short)]
        interval: Option<u64>,
    },

    /// Show about data for `me`, `u/name`, a subreddit, or a post/comment fullname.
    Info { target: String },

    /// Submit a self post. Requires a user token with the submit scope.
    Submit {
        /// The name of the subreddit to post to.
        subreddit: String,

        /// Title of the post.
        title: String,

        /// Text content of the post.
        text: String,
    },

    /// Reply to a post (`t3_...`) or comment (`t1_...`).
    Reply {
        /// Fullname of the parent thing.
        thing_id: String,

        /// Text content of the comment.
        text: String,
    },

    /// Authorize through the browser and store the token for later commands.
    /// Requires an "installed app" registered in Reddit preferences.
    Authorize {
        /// Port to use for the localhost callback.
        #[arg(long, short)]
        port: Option<u16>,

        /// Space-separated OAuth scopes to request.
        #[arg(long)]
        scopes: Option<String>,
    },
}
