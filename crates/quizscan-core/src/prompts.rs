//! Instructions sent to the vision service for each pipeline mode.
//!
//! The output contract is identical in every mode; only the wording and the
//! number of attached images change.

/// Extraction mode: the paper is already marked, read the result off it.
pub const EXTRACT_PROMPT: &str = r#"You are reading a photographed quiz paper that has already been marked by a teacher.

Find and report:
- studentName: the student's name as written on the paper
- score: the marks the student was awarded (a number)
- totalMarks: the maximum marks available on the paper (a number)
- subject: the subject or topic of the quiz

Rules:
- Read the written or circled total if one is present; do not re-grade the paper.
- If the score is written as a fraction such as "7/10", score is 7 and totalMarks is 10.
- If the name is illegible use "Unknown Student"; if the subject is unclear use "General".
- Respond with a single JSON object containing exactly the fields studentName, score, totalMarks and subject."#;

/// Grading mode with an answer key: image 1 is the key, image 2 the student's paper.
pub const GRADE_WITH_REFERENCE_PROMPT: &str = r#"You are grading a student's quiz paper against an answer key.

The FIRST image is the reference answer key. The SECOND image is the student's paper.

Steps:
1. List every question on the answer key together with its correct answer and its marks (1 mark each unless the key says otherwise).
2. For each question, compare the student's answer with the key. Award the question's marks only when the answer matches.
3. score is the sum of marks for correctly answered questions.
4. totalMarks is the sum of marks over ALL questions on the answer key, including questions the student left blank or skipped.

Also read the student's name and the quiz subject from the papers. If the name is illegible use "Unknown Student"; if the subject is unclear use "General".

Respond with a single JSON object containing exactly the fields studentName, score, totalMarks and subject."#;

/// Grading mode without an answer key: grade from subject knowledge.
pub const GRADE_FROM_KNOWLEDGE_PROMPT: &str = r#"You are grading a student's quiz paper. No answer key is provided; use your own knowledge of the subject to decide the correct answer to each question.

Steps:
1. Identify every question on the paper and its marks (1 mark each unless the paper says otherwise).
2. Decide whether the student's answer to each question is correct.
3. score is the sum of marks for correctly answered questions.
4. totalMarks is the sum of marks over ALL questions on the paper, including questions the student left blank or skipped.

Also read the student's name and the quiz subject. If the name is illegible use "Unknown Student"; if the subject is unclear use "General".

Respond with a single JSON object containing exactly the fields studentName, score, totalMarks and subject."#;
