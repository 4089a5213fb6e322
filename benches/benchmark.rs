use criterion::{Criterion, criterion_group, criterion_main};
use pos_engine::cart::Cart;
use pos_engine::menu::Catalog;
use std::hint::black_box;

fn setup_cart(catalog: &Catalog, rounds: usize) -> Cart {
    let mut cart = Cart::new();
    for _ in 0..rounds {
        for item in catalog.iter() {
            cart.add_item(item);
        }
    }
    cart
}

fn bench_compute_totals(c: &mut Criterion) {
    let catalog = Catalog::sample();
    let cart = setup_cart(&catalog, 100);
    c.bench_function("compute totals over a large cart", |b| {
        b.iter(|| black_box(cart.totals()))
    });
}

fn bench_add_remove_cycle(c: &mut Criterion) {
    let catalog = Catalog::sample();
    let item = catalog.get("paneer-tikka").unwrap();
    let mut cart = setup_cart(&catalog, 10);
    c.bench_function("add then remove one unit", |b| {
        b.iter(|| {
            cart.add_item(black_box(item));
            cart.remove_item(black_box(&item.id));
        })
    });
}

criterion_group!(benches, bench_compute_totals, bench_add_remove_cycle);
criterion_main!(benches);
