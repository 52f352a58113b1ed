mod utils;

use utils::*;

/// Stored image paths are relative to the site root
fn upload_url(image_path: &str) -> String {
    assert!(image_path.starts_with("uploads/"), "unexpected path {}", image_path);
    format!("/{}", image_path)
}

#[tokio::test]
async fn test_create_product_missing_price() {
    let setup = TestSetupBuilder::new().build();
    let (user_id, token) = setup.signed_in_user("alice").await;

    let form = MultipartForm::new()
        .text("name", "Lamp")
        .text("user_id", &user_id.to_string());

    setup
        .send_form("POST", "/products", form, Some(&token))
        .await
        .expect_status(400)
        .expect_error("Price is required");
}

#[tokio::test]
async fn test_create_product_field_errors() {
    let setup = TestSetupBuilder::new().build();
    let (user_id, token) = setup.signed_in_user("alice").await;

    let form = MultipartForm::new()
        .text("price", "cheap")
        .text("user_id", &user_id.to_string());
    setup
        .send_form("POST", "/products", form, Some(&token))
        .await
        .expect_status(400)
        .expect_error("Invalid price format");

    let form = MultipartForm::new().text("price", "100");
    setup
        .send_form("POST", "/products", form, Some(&token))
        .await
        .expect_status(400)
        .expect_error("User ID is required");

    let form = MultipartForm::new().text("price", "100").text("user_id", "x");
    setup
        .send_form("POST", "/products", form, Some(&token))
        .await
        .expect_status(400)
        .expect_error("Invalid User ID");

    let form = MultipartForm::new()
        .text("price", "100")
        .text("user_id", "4242");
    setup
        .send_form("POST", "/products", form, Some(&token))
        .await
        .expect_status(400)
        .expect_error("User not found");
}

#[tokio::test]
async fn test_get_missing_product() {
    let setup = TestSetupBuilder::new().build();
    let (_, token) = setup.signed_in_user("alice").await;

    setup
        .get("/products/999", Some(&token))
        .await
        .expect_status(404)
        .expect_error("Product not found");

    setup
        .get("/products/abc", Some(&token))
        .await
        .expect_status(400)
        .expect_error("Invalid product ID");
}

#[tokio::test]
async fn test_product_lifecycle_with_image() {
    let setup = TestSetupBuilder::new().build();
    let (user_id, token) = setup.signed_in_user("alice").await;

    // Create with an image
    let form = MultipartForm::new()
        .text("name", "Lamp")
        .text("price", "100")
        .text("user_id", &user_id.to_string())
        .file("image", "lamp.PNG", b"first-image");
    let created = setup
        .send_form("POST", "/products", form, Some(&token))
        .await
        .expect_status(200)
        .json();

    assert_eq!(created["message"], "Product created successfully");
    let product = &created["product"];
    let product_id = product["id"].as_i64().unwrap();
    assert_eq!(product["name"], "Lamp");
    assert_eq!(product["price"], 100);
    assert_eq!(product["user"]["id"], user_id);
    assert_eq!(product["user"]["username"], "alice");

    let first_image = product["image"].as_str().unwrap().to_string();
    assert!(first_image.ends_with(".png"));

    let served = setup.get(&upload_url(&first_image), None).await.expect_status(200);
    assert_eq!(&served.body[..], b"first-image");

    // Listed and fetchable
    let listed = setup.get("/products", Some(&token)).await.expect_status(200).json();
    assert_eq!(listed["products"].as_array().unwrap().len(), 1);

    let fetched = setup
        .get(&format!("/products/{}", product_id), Some(&token))
        .await
        .expect_status(200)
        .json();
    assert_eq!(fetched["product"]["name"], "Lamp");

    // Replace price and image, keep the name
    let form = MultipartForm::new()
        .text("price", "150")
        .file("image", "lamp.jpg", b"second-image");
    let updated = setup
        .send_form(
            "PUT",
            &format!("/products/{}", product_id),
            form,
            Some(&token),
        )
        .await
        .expect_status(200)
        .json();

    assert_eq!(updated["message"], "Product updated successfully");
    assert_eq!(updated["product"]["name"], "Lamp");
    assert_eq!(updated["product"]["price"], 150);

    let second_image = updated["product"]["image"].as_str().unwrap().to_string();
    assert_ne!(first_image, second_image);
    setup.get(&upload_url(&first_image), None).await.expect_status(404);
    setup.get(&upload_url(&second_image), None).await.expect_status(200);

    // Delete removes the row and the file
    let deleted = setup
        .delete(&format!("/products/{}", product_id), Some(&token))
        .await
        .expect_status(200)
        .json();
    assert_eq!(deleted["message"], "Product deleted successfully");
    assert_eq!(deleted["product_id"], product_id);

    setup
        .get(&format!("/products/{}", product_id), Some(&token))
        .await
        .expect_status(404);
    setup.get(&upload_url(&second_image), None).await.expect_status(404);
}

#[tokio::test]
async fn test_partial_updates() {
    let setup = TestSetupBuilder::new().build();
    let (user_id, token) = setup.signed_in_user("alice").await;

    let form = MultipartForm::new()
        .text("name", "Lamp")
        .text("price", "100")
        .text("user_id", &user_id.to_string());
    setup
        .send_form("POST", "/products", form, Some(&token))
        .await
        .expect_status(200);

    // Empty values are ignored
    let form = MultipartForm::new().text("name", "").text("price", "");
    let unchanged = setup
        .send_form("PUT", "/products/1", form, Some(&token))
        .await
        .expect_status(200)
        .json();
    assert_eq!(unchanged["product"]["name"], "Lamp");
    assert_eq!(unchanged["product"]["price"], 100);
    assert!(unchanged["product"]["image"].is_null());

    setup
        .send_form(
            "PUT",
            "/products/1",
            MultipartForm::new().text("price", "ten"),
            Some(&token),
        )
        .await
        .expect_status(400)
        .expect_error("Invalid price format");

    setup
        .send_form(
            "PUT",
            "/products/77",
            MultipartForm::new().text("price", "5"),
            Some(&token),
        )
        .await
        .expect_status(404)
        .expect_error("Product not found");
}

#[tokio::test]
async fn test_product_routes_require_token() {
    let setup = TestSetupBuilder::new().build();

    setup.get("/products", None).await.expect_status(401);
    setup
        .send_form(
            "POST",
            "/products",
            MultipartForm::new().text("price", "1"),
            None,
        )
        .await
        .expect_status(401);
    setup.delete("/products/1", None).await.expect_status(401);
}

#[tokio::test]
async fn test_image_over_upload_limit_rejected() {
    let setup = TestSetupBuilder::new().with_max_upload_bytes(1024).build();
    let (user_id, token) = setup.signed_in_user("alice").await;

    let form = MultipartForm::new()
        .text("price", "100")
        .text("user_id", &user_id.to_string())
        .file("image", "huge.png", &[0u8; 8 * 1024]);
    setup
        .send_form("POST", "/products", form, Some(&token))
        .await
        .expect_status(413);

    let listed = setup.get("/products", Some(&token)).await.expect_status(200).json();
    assert!(listed["products"].as_array().unwrap().is_empty());
}
