use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::app::health_check,
        // Auth routes
        crate::handlers::register,
        crate::handlers::login,
        crate::handlers::logout,
        crate::handlers::get_current_user,
        crate::handlers::update_profile,
        // Category routes
        crate::handlers::category::list_categories,
        crate::handlers::category::get_category,
        crate::handlers::category::create_category,
        crate::handlers::category::list_category_threads,
        // Thread routes
        crate::handlers::thread::recent_threads,
        crate::handlers::thread::get_thread,
        crate::handlers::thread::create_thread,
        crate::handlers::thread::thread_posts,
        // Post routes
        crate::handlers::post::create_post,
        // Vote routes
        crate::handlers::vote::cast_vote,
        // User routes
        crate::handlers::user::get_user,
        // Stats
        crate::handlers::stats::get_stats,
    ),
    components(
        schemas(
            crate::response::ApiResponse<serde_json::Value>,
            crate::error::AppError,
            crate::models::UserModel,
            crate::models::CategoryModel,
            crate::models::ThreadModel,
            crate::models::PostModel,
            // Auth
            crate::handlers::auth::RegisterRequest,
            crate::handlers::auth::LoginRequest,
            crate::handlers::auth::AuthResponse,
            crate::handlers::auth::UpdateProfileRequest,
            // Category
            crate::handlers::category::CreateCategoryRequest,
            crate::services::category::CategoryWithStats,
            // Thread
            crate::handlers::thread::CreateThreadRequest,
            crate::services::thread::ThreadView,
            crate::services::user::AuthorSummary,
            // Post
            crate::handlers::post::CreatePostRequest,
            crate::services::reply_tree::ReplyTreeNode,
            // Vote
            crate::handlers::vote::VoteRequest,
            crate::handlers::vote::VoteResponse,
            crate::services::vote::VoteChange,
            // User
            crate::services::user::UserProfile,
            crate::services::user::ProfileThread,
            crate::services::user::ProfilePost,
            // Stats
            crate::services::stats::ForumStats,
        )
    ),
    tags(
        (name = "auth", description = "Registration, login and the caller's account"),
        (name = "categories", description = "Category listing and creation"),
        (name = "threads", description = "Threads and their reply trees"),
        (name = "posts", description = "Replies"),
        (name = "votes", description = "Voting on posts"),
        (name = "users", description = "Public user profiles"),
        (name = "stats", description = "Forum-wide totals"),
    )
)]
pub struct ApiDoc;
