//! End-to-end checkout flows against the in-memory store.

use chrono::Utc;
use common::{EntityId, Money};
use domain::{Cart, CartNotice};
use checkout::{
    AppliedPromotion, CheckoutError, CheckoutRequest, CheckoutService, PromotionRejection,
    PromotionResolver, SideEffectWarning,
};
use store::{
    Category, CreditStatus, DiscountType, InMemoryShopStore, Product, PromotionCode,
    ReferralAccount, ShopStore, ShopStoreExt,
};

fn product(name: &str, price_dinars: i64, stock: u32) -> Product {
    Product {
        id: EntityId::new(),
        name: name.to_string(),
        description: format!("{name} description"),
        category: Category::Accounts,
        image_url: "https://example.com/img.png".to_string(),
        price: Money::from_dinars(price_dinars),
        original_price: None,
        show_fake_discount: false,
        stock_quantity: stock,
        track_stock: true,
        low_stock_threshold: 5,
        created_at: Utc::now(),
    }
}

fn promotion(code: &str, percentage: u32, max_usage: Option<u32>) -> PromotionCode {
    PromotionCode {
        id: EntityId::new(),
        code: code.to_string(),
        discount_type: DiscountType::Percentage,
        discount_percentage: percentage,
        fixed_amount: Money::zero(),
        usage_count: 0,
        max_usage,
        is_active: true,
        created_at: Utc::now(),
    }
}

fn referral_account(code: &str, credit_dinars: i64) -> ReferralAccount {
    ReferralAccount {
        id: EntityId::new(),
        username: "partner".to_string(),
        referral_code: code.to_string(),
        credit_balance: Money::zero(),
        credit_per_order: Money::from_dinars(credit_dinars),
        is_active: true,
        created_at: Utc::now(),
    }
}

fn request(cart: Cart) -> CheckoutRequest {
    CheckoutRequest {
        cart,
        customer_email: "kupac@example.com".to_string(),
        promotion: None,
        referral_code: None,
    }
}

#[tokio::test]
async fn full_checkout_with_promotion_and_referral() {
    let store = InMemoryShopStore::new();
    store.insert_promotion(promotion("WELCOME10", 10, Some(100))).await.unwrap();
    let account = referral_account("PARTNER1", 50);
    let account_id = account.id;
    store.insert_referral_account(account).await.unwrap();

    let mut cart = Cart::new();
    assert_eq!(cart.add(&product("Fortnite Account", 1500, 10)), CartNotice::Added);

    let resolver = PromotionResolver::new(store.clone());
    let applied = resolver.resolve("welcome10").await.unwrap();

    let service = CheckoutService::new(store.clone());
    let mut req = request(cart);
    req.promotion = Some(applied);
    req.referral_code = Some("partner1".to_string());
    let receipt = service.checkout(req).await.unwrap();

    assert_eq!(receipt.subtotal, Money::from_dinars(1500));
    assert_eq!(receipt.discount_amount, Money::from_dinars(150));
    assert_eq!(receipt.total, Money::from_dinars(1350));
    assert!(receipt.warnings.is_empty());

    // Order snapshot
    let order = store
        .get_order_by_code(receipt.order_code.as_str())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.discount_code.as_deref(), Some("WELCOME10"));
    assert_eq!(order.referral_code.as_deref(), Some("partner1"));
    assert!(order.order_code.as_str().starts_with("GM-"));

    // Usage counter bumped
    assert_eq!(store.promotion_usage("WELCOME10").await, Some(1));

    // Exactly one pending credit for the partner, balance untouched
    let credits = store.list_referral_credits(Some(account_id)).await.unwrap();
    assert_eq!(credits.len(), 1);
    assert_eq!(credits[0].status, CreditStatus::Pending);
    assert_eq!(credits[0].credit_earned, Money::from_dinars(50));
    assert_eq!(credits[0].order_id, receipt.order_id);

    let partner = store.get_referral_account(account_id).await.unwrap().unwrap();
    assert_eq!(partner.credit_balance, Money::zero());
}

#[tokio::test]
async fn exhausted_promotion_is_rejected_before_checkout() {
    let store = InMemoryShopStore::new();
    let mut code = promotion("LIMITED", 10, Some(1));
    code.usage_count = 1;
    store.insert_promotion(code).await.unwrap();

    let resolver = PromotionResolver::new(store.clone());
    let result = resolver.resolve("LIMITED").await;
    assert!(matches!(result, Err(PromotionRejection::UsageExhausted)));

    // No order was created
    assert_eq!(store.order_count().await, 0);
}

#[tokio::test]
async fn usage_bump_brings_code_to_its_limit() {
    let store = InMemoryShopStore::new();
    store.insert_promotion(promotion("LASTONE", 10, Some(1))).await.unwrap();

    let resolver = PromotionResolver::new(store.clone());
    let service = CheckoutService::new(store.clone());

    let mut cart = Cart::new();
    cart.add(&product("Game Pass", 1200, 5));
    let mut req = request(cart);
    req.promotion = Some(resolver.resolve("LASTONE").await.unwrap());
    service.checkout(req).await.unwrap();

    // A second shopper now sees the code as exhausted
    let result = resolver.resolve("LASTONE").await;
    assert!(matches!(result, Err(PromotionRejection::UsageExhausted)));
}

#[tokio::test]
async fn order_survives_referral_side_effect_failure() {
    let store = InMemoryShopStore::new();

    let mut cart = Cart::new();
    cart.add(&product("V-Bucks", 900, 5));

    let service = CheckoutService::new(store.clone());
    let mut req = request(cart);
    req.referral_code = Some("ghost".to_string());
    let receipt = service.checkout(req).await.unwrap();

    assert_eq!(
        receipt.warnings,
        vec![SideEffectWarning::ReferralCreditSkipped {
            code: "ghost".to_string()
        }]
    );
    assert_eq!(store.order_count().await, 1);
    assert!(store.list_referral_credits(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn negative_total_checkout_is_persisted() {
    let store = InMemoryShopStore::new();
    let service = CheckoutService::new(store.clone());

    let mut cart = Cart::new();
    cart.add(&product("Addon", 500, 5));

    let mut req = request(cart);
    req.promotion = Some(AppliedPromotion {
        code: "FLAT800".to_string(),
        effect: domain::PromotionEffect::Fixed(Money::from_dinars(800)),
    });
    let receipt = service.checkout(req).await.unwrap();

    assert_eq!(receipt.total, Money::from_dinars(-300));
    let orders = store.all_orders().await.unwrap();
    assert_eq!(orders.len(), 1);
    assert!(orders[0].total_amount.is_negative());
}

#[tokio::test]
async fn validation_failures_persist_nothing() {
    let store = InMemoryShopStore::new();
    let service = CheckoutService::new(store.clone());

    let empty = service.checkout(request(Cart::new())).await;
    assert!(matches!(empty, Err(CheckoutError::EmptyCart)));

    let mut cart = Cart::new();
    cart.add(&product("Addon", 500, 5));
    let mut req = request(cart);
    req.customer_email = String::new();
    let no_email = service.checkout(req).await;
    assert!(matches!(no_email, Err(CheckoutError::EmptyEmail)));

    assert_eq!(store.order_count().await, 0);
}
