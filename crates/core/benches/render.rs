use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use httpedia_core::{
    BlockRenderer, Document, ImageMode, Preferences, Renderer, SelectorFilter, Skin, preprocess_html,
};

fn fixture() -> String {
    std::fs::read_to_string("../../tests/fixtures/article.html").unwrap()
}

fn bench_preprocess(c: &mut Criterion) {
    let html = fixture();
    let config = Default::default();

    c.bench_function("preprocess", |b| b.iter(|| preprocess_html(black_box(&html), &config)));
}

fn bench_parse(c: &mut Criterion) {
    let html = fixture();

    c.bench_function("parse", |b| b.iter(|| Document::parse(black_box(&html))));
}

fn bench_prune_and_render(c: &mut Criterion) {
    let html = fixture();
    let doc = Document::parse(&html).unwrap();
    let root = doc.content_root().unwrap();
    let filter = SelectorFilter::new().unwrap();
    let prefs = Preferences::default();

    c.bench_function("prune_and_render", |b| {
        b.iter(|| {
            let tree = filter.prune(black_box(root));
            BlockRenderer::new(&tree, &prefs).render()
        })
    });
}

fn bench_render_article(c: &mut Criterion) {
    let html = fixture();
    let renderer = Renderer::new().unwrap();

    let mut group = c.benchmark_group("render_article");

    for mode in [ImageMode::None, ImageMode::First, ImageMode::All] {
        let prefs = Preferences::new(Skin::Standard, mode);
        group.bench_with_input(BenchmarkId::new("images", mode), &prefs, |b, prefs| {
            b.iter(|| renderer.render_article(black_box(&html), "Rust_(programming_language)", prefs))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_preprocess,
    bench_parse,
    bench_prune_and_render,
    bench_render_article
);
criterion_main!(benches);
