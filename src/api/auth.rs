use log::info;
use mongodb::bson::doc;
use rocket::{http::CookieJar, serde::json::Json, Route, State};

use crate::{
    error::Result,
    model::{
        api::{
            auth::{AuthToken, StudentRequest},
            response::{Message, ResponseStatus},
        },
        common::Rejection,
        db::{Student, Vote},
        mongodb::Coll,
    },
    Config,
};

pub fn routes() -> Vec<Route> {
    routes![get_student]
}

/// Check a student may vote, and if so issue them a token to vote with.
#[post("/getStudent", data = "<request>", format = "json")]
async fn get_student(
    request: Json<StudentRequest>,
    cookies: &CookieJar<'_>,
    students: Coll<Student>,
    votes: Coll<Vote>,
    config: &State<Config>,
) -> Result<Json<Message>> {
    let credentials = &request.student_data;

    let student = match students
        .find_one(doc! { "_id": credentials.stud_number.as_str() }, None)
        .await?
    {
        Some(student) => student,
        None => return Ok(Json(Rejection::NotEligible.into())),
    };

    if !student.verify_pin(&credentials.pin) {
        return Ok(Json(Rejection::WrongCredential.into()));
    }

    if student.has_voted || Vote::any_for_student(&votes, &student.student_number).await? {
        return Ok(Json(Rejection::AlreadyVoted.into()));
    }

    let token = AuthToken::new(&student);
    cookies.add_private(token.session_cookie(config));
    info!("Issued voting token to student {}", student.student_number);

    let message = Message::message(ResponseStatus::Ok, "Student Can Now Place Their Votes");
    Ok(Json(message.with_token(token.encode(config))))
}

#[cfg(test)]
mod tests {
    use rocket::{
        http::{ContentType, Status},
        local::asynchronous::Client,
        serde::json::serde_json::json,
    };

    use crate::model::api::auth::SESSION_COOKIE;

    use super::*;

    async fn request_token(client: &Client, request: StudentRequest) -> Message {
        let response = client
            .post(uri!(get_student))
            .header(ContentType::JSON)
            .body(json!(request).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
        response.into_json().await.unwrap()
    }

    #[backend_test]
    async fn eligible_student_gets_token(client: Client, students: Coll<Student>) {
        students.insert_one(Student::example(), None).await.unwrap();

        let body = request_token(&client, StudentRequest::example()).await;
        assert_eq!(body.status, ResponseStatus::Ok);

        let config = client.rocket().state::<Config>().unwrap();
        let token = AuthToken::decode(&body.token.unwrap(), config).unwrap();
        assert_eq!(token.student_number(), Student::example().student_number);
        assert!(client.cookies().get_private(SESSION_COOKIE).is_some());
    }

    #[backend_test]
    async fn pin_is_trimmed(client: Client, students: Coll<Student>) {
        students.insert_one(Student::example(), None).await.unwrap();

        let body = request_token(&client, StudentRequest::new("123456789", " 123 ")).await;
        assert_eq!(body.status, ResponseStatus::Ok);
        assert!(body.token.is_some());
    }

    #[backend_test]
    async fn unknown_student_not_eligible(client: Client, students: Coll<Student>) {
        students.insert_one(Student::example(), None).await.unwrap();

        let body = request_token(&client, StudentRequest::new("000000000", "123")).await;
        assert_eq!(body, Rejection::NotEligible.into());
        assert!(body.token.is_none());
    }

    #[backend_test]
    async fn wrong_pin(client: Client, students: Coll<Student>) {
        students.insert_one(Student::example(), None).await.unwrap();

        let body = request_token(&client, StudentRequest::new("123456789", "321")).await;
        assert_eq!(body, Rejection::WrongCredential.into());
        assert!(body.token.is_none());
        assert!(client.cookies().get_private(SESSION_COOKIE).is_none());
    }

    #[backend_test]
    async fn existing_votes_mean_already_voted(
        client: Client,
        students: Coll<Student>,
        votes: Coll<Vote>,
    ) {
        // The flag is unset but the ledger says otherwise.
        students.insert_one(Student::example(), None).await.unwrap();
        let vote = Vote {
            student_number: Student::example().student_number,
            vote: 1,
            candidate_number: "201900001".to_string(),
        };
        votes.insert_one(vote, None).await.unwrap();

        let body = request_token(&client, StudentRequest::example()).await;
        assert_eq!(body, Rejection::AlreadyVoted.into());
    }

    #[backend_test]
    async fn voted_flag_means_already_voted(client: Client, students: Coll<Student>) {
        let mut student = Student::example();
        student.has_voted = true;
        students.insert_one(student, None).await.unwrap();

        let body = request_token(&client, StudentRequest::example()).await;
        assert_eq!(body, Rejection::AlreadyVoted.into());
    }

    #[backend_test]
    async fn malformed_body(client: Client) {
        let response = client
            .post(uri!(get_student))
            .header(ContentType::JSON)
            .body(json!({ "studentData": { "pin": "123" } }).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::UnprocessableEntity);
    }
}
