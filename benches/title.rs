use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use media_sorter::media_sort::{
    AcceleratedNormalizer, DefaultNormalizer, SubstitutionCleaner, TitleNormalizer, title_for_file_name,
};

const FILE_NAMES: &[&str] = &[
    "my_movie-2020.mp4",
    "My.Movie.2020.mp4",
    "photo_01.jpg",
    "holiday.photos_summer-2023.final.jpeg",
    "___.mp4",
    "Some Already Clean Title.pdf",
    "very_long_name_with_many_words_separated_by_underscores_and-dashes.and.dots.mkv",
    "Ääkköset_ja_öljy-2024.png",
];

fn bench_normalizer(c: &mut Criterion, name: &str, normalizer: &dyn TitleNormalizer) {
    c.bench_function(name, |b| {
        b.iter(|| {
            for file_name in FILE_NAMES {
                black_box(title_for_file_name(normalizer, black_box(file_name)));
            }
        });
    });
}

fn bench_titles(c: &mut Criterion) {
    bench_normalizer(c, "title_default", &DefaultNormalizer);
    bench_normalizer(
        c,
        "title_accelerated_substitution",
        &AcceleratedNormalizer::new(SubstitutionCleaner),
    );
}

criterion_group!(benches, bench_titles);
criterion_main!(benches);
