use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use mlb_gamecast::content_fetch::parse_game_content_json;
use mlb_gamecast::game_fetch::parse_live_feed_json;
use mlb_gamecast::video::select_highlights;

fn bench_live_feed_parse(c: &mut Criterion) {
    c.bench_function("live_feed_parse", |b| {
        b.iter(|| {
            let feed = parse_live_feed_json(black_box(LIVE_FEED_JSON)).unwrap();
            black_box(feed.plays.len());
        })
    });
}

fn bench_normalize_plays(c: &mut Criterion) {
    let feed = parse_live_feed_json(LIVE_FEED_JSON).expect("valid fixture json");
    c.bench_function("normalize_plays", |b| {
        b.iter(|| {
            let plays = black_box(&feed).display_plays();
            black_box(plays.len());
        })
    });
}

fn bench_select_highlights(c: &mut Criterion) {
    let items = parse_game_content_json(GAME_CONTENT_JSON).expect("valid fixture json");
    c.bench_function("select_highlights", |b| {
        b.iter(|| {
            let rows = select_highlights(black_box(&items));
            black_box(rows.len());
        })
    });
}

criterion_group!(
    perf,
    bench_live_feed_parse,
    bench_normalize_plays,
    bench_select_highlights
);
criterion_main!(perf);

static LIVE_FEED_JSON: &str = include_str!("../tests/fixtures/live_feed.json");
static GAME_CONTENT_JSON: &str = include_str!("../tests/fixtures/game_content.json");
