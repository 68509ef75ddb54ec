use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizscan_core::model::{QuizRecord, Student};
use quizscan_core::statistics::{compute_stats, summarize_students};

fn make_records(students: usize, per_student: usize) -> (Vec<Student>, Vec<QuizRecord>) {
    let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let roster: Vec<Student> = (0..students)
        .map(|i| Student::new(format!("Student {i}")))
        .collect();
    let mut records = Vec::with_capacity(students * per_student);
    for (i, student) in roster.iter().enumerate() {
        for j in 0..per_student {
            records.push(QuizRecord {
                id: format!("q-{i}-{j}"),
                student_id: student.id.clone(),
                student_name: student.name.clone(),
                subject: "Maths".into(),
                score: ((i + j) % 21) as f64,
                total_marks: 20.0,
                date,
                timestamp: (i * per_student + j) as i64,
                image_url: None,
            });
        }
    }
    (roster, records)
}

fn bench_compute_stats(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_stats");

    for (students, per_student) in [(10, 10), (100, 50), (500, 100)] {
        let (_, records) = make_records(students, per_student);
        group.bench_function(format!("{}_records", records.len()), |b| {
            b.iter(|| compute_stats(black_box(&records)))
        });
    }

    group.finish();
}

fn bench_summaries(c: &mut Criterion) {
    let mut group = c.benchmark_group("summarize_students");

    let (roster, records) = make_records(200, 40);
    group.bench_function("200_students", |b| {
        b.iter(|| summarize_students(black_box(&roster), black_box(&records)))
    });

    group.finish();
}

criterion_group!(benches, bench_compute_stats, bench_summaries);
criterion_main!(benches);
