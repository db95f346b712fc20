use sitepulse_api::api::{AuthApi, DashboardApi, WebsiteApi};
use sitepulse_api::{Client, ClientConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Create client configuration
    let config = ClientConfig::new("https://app.sitepulse.example/api").with_timeout(30);

    let client = Client::new(config);

    // Login
    println!("Logging in...");
    let login = client.login("user@example.com", "password").await?;
    println!("Logged in as: {}", login.user.full_name);

    // Set tokens for subsequent requests
    client.set_tokens(login.tokens()).await;

    // List websites
    println!("\nFetching websites...");
    let websites = client.list_websites().await?;
    println!("Found {} website(s):", websites.len());
    for website in &websites {
        println!("  [{}] {}", website.id, website.domain);
    }

    // Load the dashboard of the first website
    if let Some(website) = websites.first() {
        println!("\nFetching dashboard for {}...", website.domain);
        let snapshot = client.get_dashboard(website.id).await?;

        println!(
            "Realtime active users: {}",
            snapshot.realtime.active_users
        );
        if let Some(sessions) = snapshot.overview.metric("sessions") {
            println!("Sessions: {}", sessions);
        }
        println!("Top pages:");
        for page in snapshot.top_pages.iter().take(5) {
            println!("  {} - {} views", page.page_path, page.views);
        }
    }

    println!("\nDone!");

    Ok(())
}
