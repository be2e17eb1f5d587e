use h1ser::{
    Request, Response, Serializer,
    body::{Full, channel},
    headers::{HeaderValue, standard::{CONTENT_TYPE, HOST}},
    http::{Method, StatusCode},
    write,
};
use std::{io, time::Duration};
use tokio::{io::AsyncWriteExt, runtime::Runtime};

fn main() -> io::Result<()> {
    env_logger::init();

    // fixed length request, blocking writer
    let mut req = Request::new(Method::POST, "/tasks", Full::new("name=serialize"));
    req.headers_mut().insert(HOST, HeaderValue::from_static(b"localhost:3000"));
    req.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(b"application/x-www-form-urlencoded"));
    req.prepare_payload();

    let mut stdout = io::stdout().lock();
    write::write(&mut Serializer::new(&req), &mut stdout)?;
    println!();
    drop(stdout);

    // chunked response fed through a channel, async writer
    Runtime::new()?.block_on(async {
        let (tx, body) = channel(4);
        let mut res = Response::new(StatusCode::OK, body);
        res.set_reason("OK");
        res.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static(b"text/plain"));
        res.prepare_payload();

        tokio::spawn(async move {
            for line in ["Hello", ", ", "World", "!"] {
                tokio::time::sleep(Duration::from_millis(50)).await;
                if tx.send(line).await.is_err() {
                    break;
                }
            }
        });

        let mut stdout = tokio::io::stdout();
        let mut ser = Serializer::new(&res);
        loop {
            match write::write_async(&mut ser, &mut stdout).await {
                Ok(()) => break,
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => ser.writer_mut().ready().await,
                Err(err) => return Err(err),
            }
        }
        stdout.flush().await?;
        println!();
        Ok(())
    })
}
