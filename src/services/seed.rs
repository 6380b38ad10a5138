//! Sample catalog inserted at startup

use crate::{error::AppResult, models::book::NewBook, repository::Repository};

struct SampleBook {
    isbn: &'static str,
    title: &'static str,
    author: &'static str,
    category: &'static str,
    publication_year: i32,
    description: &'static str,
    copies: i32,
    available: i32,
}

const SAMPLE_BOOKS: &[SampleBook] = &[
    SampleBook {
        isbn: "9780142424179",
        title: "The Fault in Our Stars",
        author: "John Green",
        category: "Fiction",
        publication_year: 2012,
        description: "A touching story about two teenagers with cancer who fall in love.",
        copies: 3,
        available: 2,
    },
    SampleBook {
        isbn: "9780545010221",
        title: "Harry Potter and the Deathly Hallows",
        author: "J.K. Rowling",
        category: "Fiction",
        publication_year: 2007,
        description: "The final installment in the Harry Potter series.",
        copies: 5,
        available: 1,
    },
    SampleBook {
        isbn: "9780316769488",
        title: "The Catcher in the Rye",
        author: "J.D. Salinger",
        category: "Fiction",
        publication_year: 1951,
        description: "A classic coming-of-age story about Holden Caulfield.",
        copies: 2,
        available: 0,
    },
    SampleBook {
        isbn: "9780262033848",
        title: "Introduction to Algorithms",
        author: "Thomas H. Cormen, Charles E. Leiserson",
        category: "Computer Science",
        publication_year: 2009,
        description: "Comprehensive introduction to algorithms and data structures",
        copies: 5,
        available: 4,
    },
    SampleBook {
        isbn: "9780134494166",
        title: "Clean Code: A Handbook of Agile Software Craftsmanship",
        author: "Robert C. Martin",
        category: "Programming",
        publication_year: 2008,
        description: "Best practices for writing clean, maintainable code",
        copies: 3,
        available: 2,
    },
    SampleBook {
        isbn: "9780135957059",
        title: "The Pragmatic Programmer",
        author: "David Thomas, Andrew Hunt",
        category: "Programming",
        publication_year: 2019,
        description: "Your journey to mastery in software development",
        copies: 4,
        available: 3,
    },
    SampleBook {
        isbn: "9781449355739",
        title: "Designing Data-Intensive Applications",
        author: "Martin Kleppmann",
        category: "Database",
        publication_year: 2017,
        description: "The big ideas behind reliable, scalable, and maintainable systems",
        copies: 3,
        available: 1,
    },
    SampleBook {
        isbn: "9780596007126",
        title: "Head First Design Patterns",
        author: "Eric Freeman, Elisabeth Robson",
        category: "Software Engineering",
        publication_year: 2004,
        description: "A brain-friendly guide to design patterns",
        copies: 2,
        available: 2,
    },
    SampleBook {
        isbn: "9780134052502",
        title: "Operating System Concepts",
        author: "Abraham Silberschatz, Peter Baer Galvin",
        category: "Operating Systems",
        publication_year: 2018,
        description: "Comprehensive introduction to operating systems",
        copies: 4,
        available: 3,
    },
    SampleBook {
        isbn: "9780134685991",
        title: "Effective Java",
        author: "Joshua Bloch",
        category: "Programming",
        publication_year: 2017,
        description: "Best practices for the Java programming language",
        copies: 3,
        available: 3,
    },
    SampleBook {
        isbn: "9781593279509",
        title: "Eloquent JavaScript",
        author: "Marijn Haverbeke",
        category: "Web Development",
        publication_year: 2018,
        description: "A modern introduction to programming with JavaScript",
        copies: 4,
        available: 2,
    },
    SampleBook {
        isbn: "9780132350884",
        title: "Clean Architecture",
        author: "Robert C. Martin",
        category: "Software Architecture",
        publication_year: 2017,
        description: "A craftsman's guide to software structure and design",
        copies: 3,
        available: 1,
    },
    SampleBook {
        isbn: "9780596516178",
        title: "JavaScript: The Good Parts",
        author: "Douglas Crockford",
        category: "Web Development",
        publication_year: 2008,
        description: "Unearthing the excellence in JavaScript",
        copies: 2,
        available: 0,
    },
    SampleBook {
        isbn: "9780262046305",
        title: "Artificial Intelligence: A Modern Approach",
        author: "Stuart Russell, Peter Norvig",
        category: "Artificial Intelligence",
        publication_year: 2020,
        description: "Comprehensive introduction to artificial intelligence",
        copies: 5,
        available: 3,
    },
    SampleBook {
        isbn: "9780131103627",
        title: "The C Programming Language",
        author: "Brian W. Kernighan, Dennis M. Ritchie",
        category: "Programming",
        publication_year: 1988,
        description: "Classic reference for C programming by the creators of the language",
        copies: 4,
        available: 3,
    },
    SampleBook {
        isbn: "9780201633610",
        title: "Design Patterns: Elements of Reusable Object-Oriented Software",
        author: "Erich Gamma, Richard Helm, Ralph Johnson, John Vlissides",
        category: "Software Engineering",
        publication_year: 1994,
        description: "The Gang of Four book on design patterns",
        copies: 3,
        available: 2,
    },
    SampleBook {
        isbn: "9780262035613",
        title: "Deep Learning",
        author: "Ian Goodfellow, Yoshua Bengio, Aaron Courville",
        category: "Artificial Intelligence",
        publication_year: 2016,
        description: "Foundational textbook on deep learning and neural networks",
        copies: 5,
        available: 4,
    },
    SampleBook {
        isbn: "9780262510875",
        title: "Structure and Interpretation of Computer Programs",
        author: "Harold Abelson, Gerald Jay Sussman",
        category: "Programming Languages",
        publication_year: 1996,
        description: "A legendary introduction to computer science concepts",
        copies: 3,
        available: 2,
    },
    SampleBook {
        isbn: "9780131101630",
        title: "Computer Networks",
        author: "Andrew S. Tanenbaum, David J. Wetherall",
        category: "Networking",
        publication_year: 2011,
        description: "Comprehensive textbook on computer networks",
        copies: 5,
        available: 4,
    },
    SampleBook {
        isbn: "9780132143011",
        title: "Database System Concepts",
        author: "Abraham Silberschatz, Henry Korth, S. Sudarshan",
        category: "Database",
        publication_year: 2010,
        description: "Comprehensive introduction to database systems",
        copies: 4,
        available: 3,
    },
    SampleBook {
        isbn: "9780123748560",
        title: "Computer Organization and Design",
        author: "David A. Patterson, John L. Hennessy",
        category: "Computer Architecture",
        publication_year: 2014,
        description: "Textbook on computer organization and design principles",
        copies: 5,
        available: 4,
    },
    SampleBook {
        isbn: "9781558606043",
        title: "Modern Operating Systems",
        author: "Andrew S. Tanenbaum",
        category: "Operating Systems",
        publication_year: 2001,
        description: "Classic OS textbook by Tanenbaum",
        copies: 4,
        available: 3,
    },
    SampleBook {
        isbn: "9780596009205",
        title: "Learning Python",
        author: "Mark Lutz",
        category: "Programming",
        publication_year: 2013,
        description: "Comprehensive guide to Python programming",
        copies: 5,
        available: 4,
    },
    SampleBook {
        isbn: "9781449331818",
        title: "Fluent Python",
        author: "Luciano Ramalho",
        category: "Programming",
        publication_year: 2015,
        description: "Best practices for writing Pythonic code",
        copies: 3,
        available: 2,
    },
    SampleBook {
        isbn: "9781491903995",
        title: "Python for Data Analysis",
        author: "Wes McKinney",
        category: "Data Science",
        publication_year: 2017,
        description: "Practical guide for analyzing data with Python and Pandas",
        copies: 4,
        available: 3,
    },
    SampleBook {
        isbn: "9781788622212",
        title: "Mastering React",
        author: "Adam Horton, Ryan Vice",
        category: "Web Development",
        publication_year: 2018,
        description: "Advanced guide for mastering React.js",
        copies: 3,
        available: 2,
    },
    SampleBook {
        isbn: "9781492051367",
        title: "Learning React",
        author: "Alex Banks, Eve Porcello",
        category: "Web Development",
        publication_year: 2020,
        description: "Beginner-friendly guide to learning React.js",
        copies: 4,
        available: 3,
    },
    SampleBook {
        isbn: "9781492052203",
        title: "Kubernetes: Up and Running",
        author: "Kelsey Hightower, Brendan Burns, Joe Beda",
        category: "Cloud Computing",
        publication_year: 2019,
        description: "Guide to deploying and managing applications with Kubernetes",
        copies: 3,
        available: 2,
    },
    SampleBook {
        isbn: "9781491950357",
        title: "Site Reliability Engineering",
        author: "Niall Richard Murphy, Betsy Beyer",
        category: "DevOps",
        publication_year: 2016,
        description: "Google’s guide to building reliable, scalable systems",
        copies: 2,
        available: 1,
    },
    SampleBook {
        isbn: "9781118026472",
        title: "Cybersecurity and Cyberwar: What Everyone Needs to Know",
        author: "P.W. Singer, Allan Friedman",
        category: "Cybersecurity",
        publication_year: 2014,
        description: "Essential introduction to cybersecurity concepts",
        copies: 3,
        available: 2,
    },
    SampleBook {
        isbn: "9783319924263",
        title: "Computer Vision: Algorithms and Applications",
        author: "Richard Szeliski",
        category: "Artificial Intelligence",
        publication_year: 2022,
        description: "Comprehensive book on modern computer vision techniques",
        copies: 4,
        available: 3,
    },
    SampleBook {
        isbn: "9781119706670",
        title: "Hands-On Machine Learning with Scikit-Learn, Keras, and TensorFlow",
        author: "Aurélien Géron",
        category: "Machine Learning",
        publication_year: 2019,
        description: "Practical guide for machine learning and deep learning",
        copies: 5,
        available: 4,
    },
    SampleBook {
        isbn: "9780262039246",
        title: "Algorithms to Live By",
        author: "Brian Christian, Tom Griffiths",
        category: "Computer Science",
        publication_year: 2016,
        description: "How computer science algorithms apply to everyday life",
        copies: 3,
        available: 2,
    },
    SampleBook {
        isbn: "9780133594140",
        title: "Computer Security: Principles and Practice",
        author: "William Stallings, Lawrie Brown",
        category: "Cybersecurity",
        publication_year: 2017,
        description: "Comprehensive introduction to computer security concepts",
        copies: 4,
        available: 3,
    },
];

/// Insert the sample catalog. Books whose ISBN is already present are left
/// untouched. Returns the number of books inserted.
pub async fn seed_sample_catalog(repository: &Repository) -> AppResult<usize> {
    let mut inserted = 0;

    for sample in SAMPLE_BOOKS {
        let book = NewBook {
            isbn: sample.isbn.to_string(),
            title: sample.title.to_string(),
            author: sample.author.to_string(),
            category: Some(sample.category.to_string()),
            publication_year: Some(sample.publication_year),
            description: Some(sample.description.to_string()),
            copies: sample.copies,
        };

        if repository.books.insert_if_absent(&book, sample.available).await? {
            inserted += 1;
        }
    }

    tracing::info!(inserted, total = SAMPLE_BOOKS.len(), "Sample catalog seeded");
    Ok(inserted)
}
