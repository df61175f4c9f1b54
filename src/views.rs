//! HTML Views
//!
//! Server-rendered markup for every page. All dynamic text goes through
//! `escape` before it is interpolated.

use crate::models::{Post, PostForm, SignInForm, SignUpForm, UserProfile};

pub const APP_TITLE: &str = "Post Management";

const STYLE: &str = r#"
body { margin: 0; font-family: system-ui, sans-serif; background: #f3f4f6; color: #1f2937; }
header { background: #fff; box-shadow: 0 1px 2px rgba(0,0,0,.08); padding: 1rem 1.5rem; display: flex; justify-content: space-between; align-items: center; }
header h1 { font-size: 1.5rem; margin: 0; }
header a { color: inherit; text-decoration: none; }
nav a { margin-right: 1.5rem; color: #4b5563; }
nav a.active { font-weight: 700; color: #9333ea; }
main { display: flex; justify-content: center; padding: 2rem 1rem; }
.container { width: 100%; max-width: 64rem; }
.card { background: #fff; padding: 2rem; border-radius: .5rem; box-shadow: 0 1px 3px rgba(0,0,0,.1); }
.narrow { max-width: 42rem; margin: 0 auto; }
.grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(18rem, 1fr)); gap: 1.5rem; }
.meta { display: flex; justify-content: space-between; font-size: .75rem; color: #6b7280; margin-top: 1rem; }
.error { margin-bottom: 1rem; padding: .75rem; background: #fee2e2; color: #b91c1c; border: 1px solid #f87171; border-radius: .375rem; }
.notice { margin-bottom: 1rem; padding: .75rem; background: #dcfce7; color: #166534; border: 1px solid #4ade80; border-radius: .375rem; }
label { display: block; font-weight: 600; font-size: .875rem; margin-bottom: .5rem; }
input[type=text], input[type=email], input[type=password], textarea { width: 100%; box-sizing: border-box; padding: .5rem 1rem; border: 1px solid #d1d5db; border-radius: .375rem; margin-bottom: 1rem; }
button, .button { display: inline-block; padding: .5rem 1rem; border: 0; border-radius: .375rem; background: #9333ea; color: #fff; cursor: pointer; text-decoration: none; font-size: .875rem; }
.button.outline { background: #fff; color: #374151; border: 1px solid #d1d5db; }
button.danger, .button.danger { background: #ef4444; }
.actions { display: flex; gap: .5rem; margin-top: 1rem; }
"#;

/// Escapes text for use in element content and quoted attribute values.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

fn document(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title} | {APP_TITLE}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n{body}\n</body>\n</html>\n",
        title = escape(title),
    )
}

fn error_banner(error: Option<&str>) -> String {
    error
        .map(|message| format!("<div class=\"error\" role=\"alert\">{}</div>", escape(message)))
        .unwrap_or_default()
}

// --- Layouts ---

/// Header with sign-in / sign-up links for anonymous pages.
fn auth_layout(title: &str, content: &str) -> String {
    let body = format!(
        r#"<header>
  <a href="/"><h1>{APP_TITLE}</h1></a>
  <div><a href="/auth/signin">Sign In</a> &nbsp; <a class="button" href="/auth/signup">Sign Up</a></div>
</header>
<main>{content}</main>"#
    );
    document(title, &body)
}

/// Whether the nav entry `href` is active for `current`: same path or a descendant.
pub fn is_active(current: &str, href: &str) -> bool {
    current == href
        || current
            .strip_prefix(href)
            .is_some_and(|rest| rest.starts_with('/'))
}

fn nav_link(href: &str, label: &str, active: bool) -> String {
    let class = if active { " class=\"active\"" } else { "" };
    format!("<a href=\"{href}\"{class}>{label}</a>")
}

/// Header with navigation and the logout button for dashboard pages.
fn dashboard_layout(current: &str, title: &str, content: &str) -> String {
    let all_posts = is_active(current, "/dashboard/posts") && !is_active(current, "/dashboard/myposts");
    let my_posts = is_active(current, "/dashboard/myposts");
    let create = is_active(current, "/dashboard/myposts/create-post");

    let body = format!(
        r#"<header>
  <a href="/dashboard/posts"><h1>{APP_TITLE}</h1></a>
  <nav>
    {all}
    {mine}
    {create}
    <form method="post" action="/api/auth/logout" style="display:inline"><button type="submit" class="danger">Logout</button></form>
  </nav>
</header>
<main><div class="container">{content}</div></main>"#,
        all = nav_link("/dashboard/posts", "All Posts", all_posts),
        mine = nav_link("/dashboard/myposts", "My Posts", my_posts),
        create = nav_link("/dashboard/myposts/create-post", "Create Post", create),
    );
    document(title, &body)
}

// --- Anonymous Pages ---

pub fn landing_page() -> String {
    let content = format!(
        r#"<div class="card narrow" style="text-align:center">
  <h2>Welcome to {APP_TITLE}</h2>
  <p>Share posts and browse what others have written.</p>
  <div class="actions" style="justify-content:center">
    <a class="button" href="/auth/signup">Create Account</a>
    <a class="button outline" href="/auth/signin">Sign In</a>
  </div>
</div>"#
    );
    auth_layout("Welcome", &content)
}

pub fn sign_in_page(form: &SignInForm, error: Option<&str>, notice: Option<&str>) -> String {
    let notice = notice
        .map(|text| format!("<div class=\"notice\">{}</div>", escape(text)))
        .unwrap_or_default();
    let checked = if form.remember_me() { " checked" } else { "" };

    let content = format!(
        r#"<div class="card narrow">
  <div style="text-align:center"><h2>Welcome Back</h2><p>Sign in to your account</p></div>
  {notice}
  <form method="post" action="/auth/signin">
    {error}
    <label for="email">Email</label>
    <input type="email" id="email" name="email" placeholder="Enter your email" value="{email}" required>
    <label for="password">Password</label>
    <input type="password" id="password" name="password" placeholder="Enter your password" required>
    <p><label><input type="checkbox" id="remember_me" name="remember_me"{checked}> Remember me</label></p>
    <button type="submit" style="width:100%">Sign In</button>
  </form>
  <p style="text-align:center">Don't have an account? <a href="/auth/signup">Sign up</a></p>
</div>"#,
        error = error_banner(error),
        email = escape(&form.email),
    );
    auth_layout("Sign In", &content)
}

pub fn sign_up_page(form: &SignUpForm, error: Option<&str>) -> String {
    let content = format!(
        r#"<div class="card narrow">
  <div style="text-align:center"><h2>Create Account</h2><p>Join us today</p></div>
  <form method="post" action="/auth/signup">
    {error}
    <label for="name">Name</label>
    <input type="text" id="name" name="name" placeholder="Enter your name" value="{name}" required>
    <label for="email">Email</label>
    <input type="email" id="email" name="email" placeholder="Enter your email" value="{email}" required>
    <label for="password">Password</label>
    <input type="password" id="password" name="password" placeholder="Enter your password" required>
    <label for="confirm_password">Confirm Password</label>
    <input type="password" id="confirm_password" name="confirm_password" placeholder="Confirm your password" required>
    <button type="submit" style="width:100%">Create Account</button>
  </form>
  <p style="text-align:center">Already have an account? <a href="/auth/signin">Sign in</a></p>
</div>"#,
        error = error_banner(error),
        name = escape(&form.name),
        email = escape(&form.email),
    );
    auth_layout("Sign Up", &content)
}

// --- Dashboard Pages ---

pub fn dashboard_page(profile: &UserProfile) -> String {
    let content = format!(
        r#"<div class="card narrow" style="text-align:center">
  <h1>Welcome to Your Dashboard!</h1>
  <p>Hello, <strong>{email}</strong>!</p>
  <p>This is your protected area, accessible only after successful authentication.</p>
  <div class="actions" style="justify-content:center">
    <a class="button" href="/dashboard/posts">Browse Posts</a>
    <a class="button outline" href="/dashboard/myposts">My Posts</a>
  </div>
</div>"#,
        email = escape(&profile.email),
    );
    dashboard_layout("/dashboard", "Dashboard", &content)
}

fn post_card(post: &Post, owner_actions: bool) -> String {
    let actions = if owner_actions {
        format!(
            r#"<div class="actions">
    <a class="button outline" href="/dashboard/myposts/{id}">View</a>
    <a class="button outline" href="/dashboard/myposts/{id}/edit">Edit</a>
    <a class="button danger" href="/dashboard/myposts/{id}/delete">Delete</a>
  </div>"#,
            id = post.id
        )
    } else {
        String::new()
    };

    format!(
        r#"<div class="card">
  <h3>{title}</h3>
  <p>{description}</p>
  <div class="meta"><span>{author}</span><span>{date}</span></div>
  {actions}
</div>"#,
        title = escape(&post.title),
        description = escape(&post.description),
        author = escape(post.author_label()),
        date = post.created_on(),
    )
}

fn post_grid(posts: &[Post], owner_actions: bool, empty: &str) -> String {
    if posts.is_empty() {
        return format!("<p style=\"text-align:center\">{empty}</p>");
    }
    let cards: String = posts.iter().map(|post| post_card(post, owner_actions)).collect();
    format!("<div class=\"grid\">{cards}</div>")
}

pub fn all_posts_page(posts: &[Post]) -> String {
    let content = format!(
        "<h2>All Posts</h2>{}",
        post_grid(posts, false, "No posts found yet.")
    );
    dashboard_layout("/dashboard/posts", "All Posts", &content)
}

pub fn my_posts_page(posts: &[Post], error: Option<&str>) -> String {
    let content = format!(
        r#"<div style="display:flex;justify-content:space-between;align-items:center">
  <h2>My Posts</h2><a class="button" href="/dashboard/myposts/create-post">Create New Post</a>
</div>
{error}
{grid}"#,
        error = error_banner(error),
        grid = post_grid(posts, true, "You haven't created any posts yet."),
    );
    dashboard_layout("/dashboard/myposts", "My Posts", &content)
}

pub fn post_detail_page(post: &Post) -> String {
    let content = format!(
        r#"<div class="card">
  <h1>{title}</h1>
  <p style="white-space:pre-wrap">{description}</p>
  <div class="meta"><span>By {author}</span><span>Created {created} &middot; Updated {updated}</span></div>
  <div class="actions">
    <a class="button outline" href="/dashboard/myposts">Back to My Posts</a>
    <a class="button" href="/dashboard/myposts/{id}/edit">Edit</a>
  </div>
</div>"#,
        title = escape(&post.title),
        description = escape(&post.description),
        author = escape(post.author_label()),
        created = post.created_on(),
        updated = post.updated_on(),
        id = post.id,
    );
    dashboard_layout(&format!("/dashboard/myposts/{}", post.id), &post.title, &content)
}

fn post_form(action: &str, heading: &str, submit: &str, form: &PostForm, error: Option<&str>) -> String {
    format!(
        r#"<div class="card narrow">
  <h2>{heading}</h2>
  <form method="post" action="{action}">
    {error}
    <label for="title">Title</label>
    <input type="text" id="title" name="title" placeholder="Enter post title" value="{title}" required>
    <label for="description">Description</label>
    <textarea id="description" name="description" rows="8" placeholder="Write your post">{description}</textarea>
    <button type="submit">{submit}</button>
  </form>
</div>"#,
        error = error_banner(error),
        title = escape(&form.title),
        description = escape(&form.description),
    )
}

pub fn create_post_page(form: &PostForm, error: Option<&str>) -> String {
    let action = "/dashboard/myposts/create-post";
    let content = post_form(action, "Create New Post", "Create Post", form, error);
    dashboard_layout(action, "Create Post", &content)
}

pub fn edit_post_page(id: i64, form: &PostForm, error: Option<&str>) -> String {
    let action = format!("/dashboard/myposts/{id}/edit");
    let content = post_form(&action, "Edit Post", "Save Changes", form, error);
    dashboard_layout(&action, "Edit Post", &content)
}

/// Replaces the client-side confirmation modal with a page of its own.
pub fn confirm_delete_page(post: &Post) -> String {
    let content = format!(
        r#"<div class="card narrow" role="dialog" aria-labelledby="confirm-title">
  <h2 id="confirm-title">Confirm Deletion</h2>
  <p>Are you sure you want to delete "{title}"? This action cannot be undone.</p>
  <form method="post" action="/dashboard/myposts/{id}/delete" class="actions">
    <a class="button outline" href="/dashboard/myposts">Cancel</a>
    <button type="submit" class="danger">Delete</button>
  </form>
</div>"#,
        title = escape(&post.title),
        id = post.id,
    );
    dashboard_layout("/dashboard/myposts", "Confirm Deletion", &content)
}

// --- Failure Pages ---

pub fn not_found_page() -> String {
    let content = r#"<div class="card narrow" style="text-align:center">
  <h2>Not Found</h2>
  <p>The page or post you are looking for does not exist.</p>
  <a class="button" href="/dashboard">Go to Dashboard</a>
</div>"#;
    auth_layout("Not Found", content)
}

pub fn error_page(heading: &str, message: &str) -> String {
    let content = format!(
        r#"<div class="card narrow" style="text-align:center">
  <h2 style="color:#dc2626">{heading}</h2>
  <p>{message}</p>
  <a class="button" href="/dashboard">Go to Dashboard</a>
</div>"#,
        heading = escape(heading),
        message = escape(message),
    );
    auth_layout(heading, &content)
}
