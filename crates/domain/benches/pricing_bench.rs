use chrono::Utc;
use common::{EntityId, Money};
use criterion::{Criterion, criterion_group, criterion_main};
use domain::{Cart, PricedTotals, PromotionEffect};
use store::{Category, Product};

fn make_product(i: u32) -> Product {
    Product {
        id: EntityId::new(),
        name: format!("Product {i}"),
        description: "Benchmark product".to_string(),
        category: Category::Addons,
        image_url: "https://example.com/img.png".to_string(),
        price: Money::from_dinars(100 + i as i64),
        original_price: None,
        show_fake_discount: false,
        stock_quantity: 50,
        track_stock: true,
        low_stock_threshold: 5,
        created_at: Utc::now(),
    }
}

fn bench_cart_build(c: &mut Criterion) {
    let products: Vec<Product> = (0..50).map(make_product).collect();

    c.bench_function("pricing/cart_build_50_lines", |b| {
        b.iter(|| {
            let mut cart = Cart::new();
            for product in &products {
                cart.add(product);
            }
            cart.subtotal()
        });
    });
}

fn bench_price_with_percentage(c: &mut Criterion) {
    let mut cart = Cart::new();
    for product in (0..50).map(make_product) {
        cart.add(&product);
    }
    let subtotal = cart.subtotal();

    c.bench_function("pricing/price_percentage", |b| {
        b.iter(|| PricedTotals::price(subtotal, Some(PromotionEffect::Percentage(10))));
    });
}

criterion_group!(benches, bench_cart_build, bench_price_with_percentage);
criterion_main!(benches);
