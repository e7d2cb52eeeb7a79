use postsift::types::Post;

/// Create sample blog posts for the demos.
pub fn sample_posts() -> Vec<Post> {
  vec![
    post(
      "blog/getting-started-with-rust",
      "Getting Started with Rust",
      "A beginner's tour of ownership, borrowing, and the toolchain.",
      "Rust is a systems programming language that runs blazingly fast and guarantees memory safety without a garbage collector.",
      "2024-03-01",
      &["Rust", "Tutorial"],
      true,
    ),
    post(
      "blog/react-hooks-guide",
      "React Hooks Guide",
      "Everything you need to know about hooks in modern React.",
      "Hooks let function components manage state and side effects without classes.",
      "2024-01-20",
      &["React", "JavaScript"],
      true,
    ),
    post(
      "blog/nodejs-streaming",
      "Streaming Data in Node.js",
      "Backpressure, pipes, and practical stream patterns.",
      "Node.js streams process data incrementally instead of buffering whole payloads in memory.",
      "2023-11-05",
      &["Node.js", "JavaScript"],
      true,
    ),
    post(
      "blog/typescript-generics",
      "Understanding TypeScript Generics",
      "From simple type parameters to conditional types.",
      "Generics let you write reusable components that keep full type safety.",
      "2023-06-18",
      &["TypeScript", "JavaScript"],
      true,
    ),
    post(
      "blog/unfinished-draft",
      "An Unfinished Draft",
      "Not ready yet.",
      "Work in progress.",
      "2024-02-10",
      &["Meta"],
      false,
    ),
  ]
}

fn post(
  slug: &str,
  title: &str,
  description: &str,
  body: &str,
  date: &str,
  tags: &[&str],
  published: bool,
) -> Post {
  Post {
    slug: slug.to_string(),
    slug_as_params: slug.rsplit('/').next().unwrap_or(slug).to_string(),
    title: title.to_string(),
    description: Some(description.to_string()),
    body: Some(body.to_string()),
    date: date.to_string(),
    tags: tags.iter().map(|t| t.to_string()).collect(),
    published,
  }
}
